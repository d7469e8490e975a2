use crate::constants::{ENV_ETX, ENV_INFO, ENV_IS, ENV_NUL, ENV_SEND, ENV_SOH};

/// The three NEW_ENVIRON (RFC 1572) operation bytes this engine acts on. The
/// full RFC defines `VAR`/`USERVAR`/`ESC` type tags for a richer grammar;
/// this engine's wire format is the simpler one `telnetlib3` actually speaks
/// on the wire - variables NUL/ETX-delimited, names and values split on a
/// single SOH - which is what real MUD clients send regardless of what the
/// RFC says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentOperation {
    Is,
    Send,
    Info,
    Unknown(u8),
}

impl From<u8> for EnvironmentOperation {
    fn from(byte: u8) -> Self {
        match byte {
            ENV_IS => EnvironmentOperation::Is,
            ENV_SEND => EnvironmentOperation::Send,
            ENV_INFO => EnvironmentOperation::Info,
            other => EnvironmentOperation::Unknown(other),
        }
    }
}

impl From<EnvironmentOperation> for u8 {
    fn from(op: EnvironmentOperation) -> Self {
        match op {
            EnvironmentOperation::Is => ENV_IS,
            EnvironmentOperation::Send => ENV_SEND,
            EnvironmentOperation::Info => ENV_INFO,
            EnvironmentOperation::Unknown(byte) => byte,
        }
    }
}

/// Splits an `IS`/`INFO` payload (the bytes after the operation byte) into
/// `(name, value)` pairs. Variables are separated by `NUL` or `ETX`; within
/// a variable, a single `SOH` separates the name from its value. A variable
/// with no `SOH` carries no value.
#[must_use]
pub fn decode_env_vars(payload: &[u8]) -> Vec<(String, Option<Vec<u8>>)> {
    payload
        .split(|&b| b == ENV_NUL || b == ENV_ETX)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.iter().position(|&b| b == ENV_SOH) {
            Some(pos) => {
                let name = String::from_utf8_lossy(&segment[..pos]).into_owned();
                (name, Some(segment[pos + 1..].to_vec()))
            }
            None => (String::from_utf8_lossy(segment).into_owned(), None),
        })
        .collect()
}

/// Builds the payload for `IAC SB NEW_ENVIRON SEND IS var1 NUL var2 NUL …
/// var_n ETX IAC SE`, the only direction this engine emits (replying to the
/// remote's SEND with our own IS is out of scope, see `request_env`).
#[must_use]
pub fn encode_env_send(names: &[String]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(names.iter().map(|n| n.len() + 1).sum::<usize>() + 3);
    buf.push(ENV_SEND);
    buf.push(ENV_IS);
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            buf.push(ENV_NUL);
        }
        buf.extend(name.as_bytes());
    }
    buf.push(ENV_ETX);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_decodes_to_no_vars() {
        assert!(decode_env_vars(&[]).is_empty());
    }

    #[test]
    fn single_var_without_value() {
        let decoded = decode_env_vars(b"TERM");
        assert_eq!(decoded, vec![("TERM".to_string(), None)]);
    }

    #[test]
    fn var_with_value_splits_on_soh() {
        let mut payload = b"USER".to_vec();
        payload.push(ENV_SOH);
        payload.extend(b"guest");
        let decoded = decode_env_vars(&payload);
        assert_eq!(decoded, vec![("USER".to_string(), Some(b"guest".to_vec()))]);
    }

    #[test]
    fn multiple_vars_nul_and_etx_delimited() {
        let mut payload = b"USER".to_vec();
        payload.push(ENV_SOH);
        payload.extend(b"guest");
        payload.push(ENV_NUL);
        payload.extend(b"TERM");
        payload.push(ENV_SOH);
        payload.extend(b"xterm");
        payload.push(ENV_ETX);

        let decoded = decode_env_vars(&payload);
        assert_eq!(
            decoded,
            vec![
                ("USER".to_string(), Some(b"guest".to_vec())),
                ("TERM".to_string(), Some(b"xterm".to_vec())),
            ]
        );
    }

    #[test]
    fn encode_send_joins_names_with_nul_and_terminates_with_etx() {
        let names = vec!["USER".to_string(), "TERM".to_string(), "DISPLAY".to_string()];
        let encoded = encode_env_send(&names);
        assert_eq!(encoded[0], ENV_SEND);
        assert_eq!(encoded[1], ENV_IS);
        assert_eq!(&encoded[2..], b"USER\x00TERM\x00DISPLAY\x03");
    }
}
