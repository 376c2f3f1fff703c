#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cinema_backend::run().await;
}
