//! Minimal responder wired through the pipeline.
//!
//! Reads one SHIORI request per blank-line-terminated block from stdin and
//! writes the wire response to stdout. Run with:
//!
//! ```sh
//! printf 'GET SHIORI/3.0\r\nID: OnBoot\r\n\r\n' | cargo run --example echo
//! ```

use std::io::Read;

use shiori_dispatch::{Headers, Pipeline, Request};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let defaults: Headers = [("Charset", "UTF-8"), ("Sender", "echo")]
        .into_iter()
        .collect();

    let pipeline = Pipeline::new(|request: Request| async move {
        match request.headers().get("ID") {
            Some("version") => "0.1.0".to_owned(),
            Some("OnBoot") => "\\h\\s[0]Hello.\\e".to_owned(),
            Some(id) => format!("\\h\\s[0]{id} received.\\e"),
            None => String::new(),
        }
    })
    .with_default_headers(defaults);

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    print!("{}", pipeline.dispatch_text(input).await);
    Ok(())
}
