// Invocation response
//
// S3 notifications are asynchronous invocations, so nobody reads the body;
// it is kept for parity with manual `aws lambda invoke` runs.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl InvocationResponse {
    /// Every invocation that did not error reports 200, however many
    /// records were rejected.
    pub fn ok() -> Self {
        Self { status_code: 200 }
    }
}
