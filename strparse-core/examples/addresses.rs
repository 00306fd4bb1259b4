use strparse_core::address::parse_addresses;

fn main() {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| r#""Smith, John" <john@example.com>; amy@example.org, Bob <bob@example.net>"#.to_string());

    println!("Input: {:?}\n", input);
    for address in parse_addresses(&input) {
        println!("  name: {:<20} email: {}", address.name, address.email);
    }
}
