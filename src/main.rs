#[actix_web::main]
async fn main() -> std::io::Result<()> {
    courses_api::run().await
}
