#[tokio::main]
async fn main() {
    if let Err(e) = medical_clinic_lib::run().await {
        eprintln!("medical-clinic: {e}");
        std::process::exit(1);
    }
}
