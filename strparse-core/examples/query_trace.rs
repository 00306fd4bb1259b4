use strparse_core::query::{self, QueryTrace};

fn main() {
    env_logger::init();

    let queries: Vec<String> = std::env::args().skip(1).collect();
    let queries = if queries.is_empty() {
        vec![r#"from=amy (dinner OR movie) -subject="weekly report""#.to_string()]
    } else {
        queries
    };

    for input in &queries {
        let mut trace = QueryTrace::new();
        query::parse_str(input, &mut trace);
        println!("{:<50} {}", input, trace.as_str());
    }
}
