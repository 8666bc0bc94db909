//! Lists every currently active API/Winbox/WebFig user session.

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let device = mikrotik_rs::connect("192.168.88.1:8728", "admin", Some("admin")).await?;

    let response = device.path(&["user", "active"]).print().await?;
    for record in response {
        println!(">> active user: {record:?}");
    }

    Ok(())
}
