//! Prints the device's CPU/memory/uptime snapshot once and exits.
//!
//! This core always reads a command's reply through to `!done` before
//! returning (spec invariant I2), so there's no streaming counterpart to
//! the interval-based polling some RouterOS API clients offer — take a
//! snapshot per call instead.

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let device = mikrotik_rs::connect("192.168.88.1:8728", "admin", Some("admin")).await?;

    let response = device.path(&["system", "resource"]).print().await?;
    for record in response {
        println!(">> system resource: {record:?}");
    }

    Ok(())
}
