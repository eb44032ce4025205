fn main() {
    match url::Url::parse("https:///path-only") {
        Ok(u) => println!("OK host={:?} path={:?} str={}", u.host_str(), u.path(), u.as_str()),
        Err(e) => println!("ERR {}", e),
    }
}
