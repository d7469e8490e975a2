use bytes::Bytes;

/// CHARSET (RFC 2066) sub-negotiation payloads, decoded from/encoded to wire
/// form. LINEMODE and NAWS sub-negotiations are parsed inline by the engine
/// instead of through this type, since their wire shape is a small fixed
/// byte layout rather than the separator-delimited lists CHARSET uses.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SubnegotiationType {
    /// Indicates an intent to begin CHARSET subnegotiation. This can only be
    /// sent after receiving a DO CHARSET after sending a WILL CHARSET (in any
    /// order).
    CharsetRequest(Vec<Bytes>),
    /// Indicates that the receiver has accepted the charset request.
    CharsetAccepted(Bytes),
    /// Indicates that the receiver acknowledges the charset request, but will
    /// not use any of the requested characters.
    CharsetRejected,
    /// Indicates that the receiver acknowledges a TTABLE-IS message, but is
    /// unable to handle it. This will terminate subnegotiation.
    CharsetTTableRejected,
}
