use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (binding_addr, state) = suncast_server::init()?;
    let router = suncast_server::app(state);

    let listener = TcpListener::bind(&binding_addr).await?;
    info!("listening on {binding_addr}");
    axum::serve(listener, router).await?;
    Ok(())
}
