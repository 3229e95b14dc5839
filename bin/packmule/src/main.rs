use eyre::Report;

#[tokio::main]
async fn main() -> Result<(), Report> {
    packmule::run().await
}
