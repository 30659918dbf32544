/// `client_id:u32_le` followed by `name\0message` UTF-8.
pub fn encode_chat(client_id: u32, name: &str, message: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + name.len() + 1 + message.len());
    out.extend_from_slice(&client_id.to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    out.push(0);
    out.extend_from_slice(message.as_bytes());
    out
}

/// Payloads shorter than 4 bytes decode to `(0, "", "")`; a payload with
/// no `\0` separator decodes to an empty message.
pub fn decode_chat(payload: &[u8]) -> (u32, String, String) {
    if payload.len() < 4 {
        return (0, String::new(), String::new());
    }
    let client_id = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
    let rest = &payload[4..];
    match rest.iter().position(|&b| b == 0) {
        Some(idx) => {
            let name = String::from_utf8_lossy(&rest[..idx]).into_owned();
            let message = String::from_utf8_lossy(&rest[idx + 1..]).into_owned();
            (client_id, name, message)
        }
        None => (client_id, String::from_utf8_lossy(rest).into_owned(), String::new()),
    }
}
