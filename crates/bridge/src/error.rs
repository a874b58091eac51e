/// Errors surfaced to the panel side of the bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The serving context is gone; the page must be reloaded before the
    /// bridge becomes reachable again.
    #[error("page connection lost, reload the page and try again")]
    Unreachable,

    /// The server answered a request with the wrong response shape.
    #[error("mismatched response for request")]
    MismatchedResponse,
}
