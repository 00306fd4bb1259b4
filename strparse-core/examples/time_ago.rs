use strparse_core::delta::{CatalogMessages, DeltaFormatter, DAY, HOUR, MINUTE, MONTH, SECOND, YEAR};
use strparse_core::messages::MessageCatalog;

const FRENCH: &str = "\
delta.just_now = à l'instant
delta.seconds = il y a {0} secondes
delta.minutes = il y a {0} minutes
delta.hours = il y a {0} heures
delta.days = il y a {0} jours
";

fn main() {
    env_logger::init();

    let mut catalog = MessageCatalog::with_defaults();
    if let Err(err) = catalog.load_properties("fr", FRENCH) {
        eprintln!("bad catalog: {}", err);
        return;
    }
    let english = DeltaFormatter::new();
    let french = DeltaFormatter::with_messages(CatalogMessages::new(&catalog, "fr_FR"));

    for millis in [-SECOND, 0, 45 * SECOND, MINUTE, 59 * MINUTE, 2 * HOUR, 3 * DAY, 40 * DAY, 2 * MONTH, 3 * YEAR] {
        let en = english.format(millis).unwrap_or_else(|| "(in the future)".to_string());
        let fr = french.format(millis).unwrap_or_else(|| "(dans le futur)".to_string());
        println!("{:>14}ms  {:<20} {}", millis, en, fr);
    }
}
