use mapforge_io::{ByteReader, ByteWriter};

/// One entry of a CLIENT_LIST payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEntry {
    pub client_id: u32,
    pub color: (u8, u8, u8),
    pub name: String,
}

/// `count:u16_le, { id:u32_le, rgb:u8x3, name_len:u8, name:bytes }*`.
pub fn encode_client_list(entries: &[ClientEntry]) -> Vec<u8> {
    let mut out = ByteWriter::new();
    out.write_u16_le(entries.len().min(u16::MAX as usize) as u16);
    for entry in entries {
        out.write_u32_le(entry.client_id);
        out.write_u8(entry.color.0);
        out.write_u8(entry.color.1);
        out.write_u8(entry.color.2);
        let name_bytes = entry.name.as_bytes();
        let name_len = name_bytes.len().min(u8::MAX as usize);
        out.write_u8(name_len as u8);
        out.write_bytes(&name_bytes[..name_len]);
    }
    out.into_inner()
}

/// Decodes as many whole entries as the payload actually contains,
/// stopping silently at the first truncated entry rather than failing.
pub fn decode_client_list(payload: &[u8]) -> Vec<ClientEntry> {
    let mut r = ByteReader::new(payload);
    let Ok(count) = r.read_u16_le() else {
        return Vec::new();
    };

    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let Ok(client_id) = r.read_u32_le() else { break };
        let Ok(red) = r.read_u8() else { break };
        let Ok(green) = r.read_u8() else { break };
        let Ok(blue) = r.read_u8() else { break };
        let Ok(name_len) = r.read_u8() else { break };
        let Ok(name_bytes) = r.read_exact(name_len as usize) else {
            break;
        };
        entries.push(ClientEntry {
            client_id,
            color: (red, green, blue),
            name: String::from_utf8_lossy(name_bytes).into_owned(),
        });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_multiple_entries() {
        let entries = vec![
            ClientEntry {
                client_id: 1,
                color: (255, 0, 0),
                name: "Alice".into(),
            },
            ClientEntry {
                client_id: 2,
                color: (0, 255, 0),
                name: "Bob".into(),
            },
        ];
        let payload = encode_client_list(&entries);
        assert_eq!(decode_client_list(&payload), entries);
    }

    #[test]
    fn truncated_payload_yields_partial_list() {
        let entries = vec![ClientEntry {
            client_id: 1,
            color: (1, 2, 3),
            name: "Alice".into(),
        }];
        let mut payload = encode_client_list(&entries);
        payload.truncate(payload.len() - 2);
        assert!(decode_client_list(&payload).is_empty());
    }
}
