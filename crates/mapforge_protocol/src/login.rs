/// Encodes a LOGIN payload: `name\0password` UTF-8, no length prefixes.
pub fn encode_login(name: &str, password: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(name.len() + password.len() + 1);
    out.extend_from_slice(name.as_bytes());
    out.push(0);
    out.extend_from_slice(password.as_bytes());
    out
}

/// Decodes a LOGIN payload. A payload with no `\0` separator is treated
/// as a bare name with an empty password.
pub fn decode_login(payload: &[u8]) -> (String, String) {
    match payload.iter().position(|&b| b == 0) {
        Some(idx) => {
            let name = String::from_utf8_lossy(&payload[..idx]).into_owned();
            let password = String::from_utf8_lossy(&payload[idx + 1..]).into_owned();
            (name, password)
        }
        None => (String::from_utf8_lossy(payload).into_owned(), String::new()),
    }
}
