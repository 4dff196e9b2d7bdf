// AWS Lambda binary entry point
//
// Build with: cargo build -p ingestgate-lambda --release
// The binary is named `bootstrap` for the provided.al2023 runtime.

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    ingestgate_lambda::run().await
}
