//! Finds enabled interfaces named `ether2` or `wlan-lan`, selecting only
//! their `name`/`disabled` properties — the query composed here is the
//! same shape as the reference RPN expansion:
//!
//! `=.proplist=name,disabled`, `?=disabled=no`, `?=name=ether2`,
//! `?=name=wlan-lan`, `?#|`, `?#&`.

use mikrotik_rs::proto::query::{and, or, IntoTerms, Key, Query};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let device = mikrotik_rs::connect("192.168.88.1:8728", "admin", Some("admin")).await?;

    let filter = and(vec![
        Key("disabled").eq("no").into_terms(),
        or(vec![Key("name").eq("ether2"), Key("name").eq("wlan-lan")]),
    ]);
    let query = Query::new(&["name", "disabled"], filter);

    let response = device.path(&["interface"]).select(query).await?;
    for record in response {
        println!(">> matching interface: {record:?}");
    }

    Ok(())
}
