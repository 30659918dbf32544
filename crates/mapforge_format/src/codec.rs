//! Shared read/write logic for both map formats, parameterized by a
//! [`Dialect`] so the two public entry points (`otbm`, `otmm`) stay thin
//! wrappers (spec.md §4.4: "both formats use the same node grammar").

use mapforge_io::{ByteReader, ByteWriter};
use mapforge_model::{
    House, Item, ItemCatalog, LoadReport, MapHeader, MapModel, MonsterSpawnArea, NpcSpawnArea,
    Position, SpawnEntry, Tile, Town, Warning, WarningAction, WarningCode, WarningSink,
};
use mapforge_nbt::{read_node, write_decoded_node, DecodedNode, RootReader};

use crate::config::LoaderConfig;
use crate::node_type::*;
use crate::CodecError;

const SUPPORTED_VERSION: u32 = 1;

pub fn load_bytes<C: ItemCatalog, W: WarningSink>(
    bytes: &[u8],
    dialect: &Dialect,
    catalog: &C,
    config: &LoaderConfig,
    sink: &mut W,
) -> Result<(MapModel, LoadReport), CodecError> {
    config.memory_guard.check_byte_len(bytes.len())?;

    let (mut root, matched_primary) =
        RootReader::open_either(bytes, dialect.magic, dialect.sibling_magic)?;
    if !matched_primary {
        let sibling = if dialect.magic == OTBM.magic { &OTMM } else { &OTBM };
        tracing::info!(from = dialect.name, to = sibling.name, "delegating to sibling format after magic sniff");
        return load_bytes(bytes, sibling, catalog, config, sink);
    }

    let tree = read_node(root.stream())?;
    if tree.node_type != NODE_ROOT {
        return Err(CodecError::UnbalancedNode("expected ROOT node"));
    }

    let mut report = LoadReport::default();
    let mut version_reader = ByteReader::new(&tree.payload);
    let version = version_reader.read_u32_le().unwrap_or(0);
    if version != SUPPORTED_VERSION {
        if config.allow_unsupported_versions {
            report.push(Warning::new(
                WarningCode::UnsupportedVersion,
                format!("unsupported format version {version}, continuing best-effort"),
                WarningAction::Continued,
            ));
        } else {
            return Err(CodecError::UnsupportedVersion(version));
        }
    }

    let map_data = tree
        .children
        .iter()
        .find(|c| c.node_type == NODE_MAP_DATA)
        .ok_or(CodecError::UnbalancedNode("missing MAP_DATA node"))?;

    let mut map = MapModel::new();
    let mut header = MapHeader {
        format_version: version,
        ..MapHeader::default()
    };

    let mut r = ByteReader::new(&map_data.payload);
    header.width = r.read_u16_le().unwrap_or(0);
    header.height = r.read_u16_le().unwrap_or(0);
    while !r.is_empty() {
        let Ok(attr) = r.read_u8() else { break };
        match attr {
            ATTR_EXT_SPAWN_FILE => header.spawnfile = r.read_string().unwrap_or_default(),
            ATTR_EXT_HOUSE_FILE => header.housefile = r.read_string().unwrap_or_default(),
            ATTR_EXT_ZONE_FILE => header.zonefile = r.read_string().unwrap_or_default(),
            _ => {
                report.push(Warning::new(
                    WarningCode::UnknownAttribute,
                    format!("unknown MAP_DATA attribute {attr:#04x}"),
                    WarningAction::Continued,
                ));
                break;
            }
        }
    }
    map.set_header(header);

    for child in &map_data.children {
        match child.node_type {
            NODE_EDITOR => {}
            NODE_DESCRIPTION => {
                let mut h = map.header().clone();
                h.description = String::from_utf8_lossy(&child.payload).into_owned();
                map.set_header(h);
            }
            NODE_TILE_DATA => {
                for tile_node in &child.children {
                    config.memory_guard.check_tile_count(map.tile_count())?;
                    if let Some(tile) = parse_tile(tile_node, dialect, catalog, config, &mut report)? {
                        if map.get_tile(tile.position.x, tile.position.y, tile.position.z).is_some() {
                            report.push(
                                Warning::new(
                                    WarningCode::DuplicateTile,
                                    "duplicate tile, keeping first",
                                    WarningAction::Dropped,
                                )
                                .with_position(tile.position),
                            );
                            continue;
                        }
                        map.put_tile(tile);
                    }
                }
            }
            NODE_TOWN_DATA => {
                for town_node in &child.children {
                    if town_node.node_type != NODE_TOWN {
                        continue;
                    }
                    let town = parse_town(town_node);
                    if map.get_town(town.id).is_some() {
                        report.push(Warning::new(
                            WarningCode::DuplicateTown,
                            format!("duplicate town id {}", town.id),
                            WarningAction::Dropped,
                        ));
                        continue;
                    }
                    map.put_town(town);
                }
            }
            NODE_HOUSE_DATA => {
                for house_node in &child.children {
                    if house_node.node_type != NODE_HOUSE {
                        continue;
                    }
                    let house = parse_house(house_node, &mut report);
                    if map.get_house(house.id).is_some() {
                        report.push(Warning::new(
                            WarningCode::DuplicateHouse,
                            format!("duplicate house id {}", house.id),
                            WarningAction::Dropped,
                        ));
                        continue;
                    }
                    map.put_house(house);
                }
            }
            NODE_SPAWN_MONSTER_DATA => {
                for area_node in &child.children {
                    if area_node.node_type != NODE_SPAWN_MONSTER_AREA {
                        continue;
                    }
                    map.append_monster_spawn(parse_monster_area(area_node));
                }
            }
            NODE_SPAWN_NPC_DATA if dialect.has_npc_spawns => {
                for area_node in &child.children {
                    if area_node.node_type != NODE_SPAWN_NPC_AREA {
                        continue;
                    }
                    map.append_npc_spawn(parse_npc_area(area_node));
                }
            }
            NODE_WAYPOINT_DATA if dialect.has_waypoints => {
                for wp_node in &child.children {
                    if wp_node.node_type != NODE_WAYPOINT {
                        continue;
                    }
                    let mut r = ByteReader::new(&wp_node.payload);
                    let name = r.read_string().unwrap_or_default();
                    let x = r.read_u16_le().unwrap_or(0);
                    let y = r.read_u16_le().unwrap_or(0);
                    let z = r.read_u8().unwrap_or(0);
                    map.set_waypoint(name, Position::new(x, y, z));
                }
            }
            other => {
                report.push(Warning::new(
                    WarningCode::UnknownNodeType,
                    format!("unknown MAP_DATA child node type {other:#04x}"),
                    WarningAction::Continued,
                ));
            }
        }
    }

    for warning in &report.warnings {
        sink.emit(warning.clone());
    }

    Ok((map, report))
}

fn parse_tile<C: ItemCatalog>(
    node: &DecodedNode,
    dialect: &Dialect,
    catalog: &C,
    config: &LoaderConfig,
    report: &mut LoadReport,
) -> Result<Option<Tile>, CodecError> {
    let is_housetile = node.node_type == NODE_HOUSETILE;
    if node.node_type != NODE_TILE && !is_housetile {
        report.push(Warning::new(
            WarningCode::UnknownNodeType,
            format!("unknown TILE_DATA child node type {:#04x}", node.node_type),
            WarningAction::Continued,
        ));
        return Ok(None);
    }

    let mut r = ByteReader::new(&node.payload);
    let x = r.read_u16_le()?;
    let y = r.read_u16_le()?;
    let z = r.read_u8()?;
    let position = Position::new(x, y, z);

    let house_id = if is_housetile { Some(r.read_u32_le()?) } else { None };

    let ground_id = r.read_u16_le().unwrap_or(0);
    let mut tile = Tile::new(position);
    tile.house_id = house_id;

    let mut ground = if ground_id != 0 { Some(Item::new(ground_id)) } else { None };

    while !r.is_empty() {
        let Ok(attr) = r.read_u8() else { break };
        match attr {
            ATTR_TILE_FLAGS => tile.map_flags = r.read_u32_le().unwrap_or(0),
            _ if ground.is_some() => {
                if !apply_item_attr(attr, &mut r, ground.as_mut().unwrap(), dialect) {
                    report.push(
                        Warning::new(
                            WarningCode::UnknownAttribute,
                            format!("unknown TILE attribute {attr:#04x}"),
                            WarningAction::Continued,
                        )
                        .with_position(position),
                    );
                    break;
                }
            }
            _ => {
                report.push(
                    Warning::new(
                        WarningCode::UnknownAttribute,
                        format!("unknown TILE attribute {attr:#04x}"),
                        WarningAction::Continued,
                    )
                    .with_position(position),
                );
                break;
            }
        }
    }

    if let Some(g) = ground.take() {
        tile.ground = resolve_item(g, Some(position), catalog, config, report)?;
    }

    let mut has_ground = tile.ground.is_some();
    for child in &node.children {
        if child.node_type != NODE_ITEM {
            report.push(
                Warning::new(
                    WarningCode::UnknownNodeType,
                    format!("unknown TILE child node type {:#04x}", child.node_type),
                    WarningAction::Continued,
                )
                .with_position(position),
            );
            continue;
        }
        let Some(item) = parse_item(child, dialect, catalog, config, Some(position), report)? else {
            continue;
        };
        if !has_ground && catalog.is_ground(item.server_id) {
            tile.ground = Some(item);
            has_ground = true;
        } else {
            tile.items.push(item);
        }
    }

    Ok(Some(tile))
}

fn parse_item<C: ItemCatalog>(
    node: &DecodedNode,
    dialect: &Dialect,
    catalog: &C,
    config: &LoaderConfig,
    position: Option<Position>,
    report: &mut LoadReport,
) -> Result<Option<Item>, CodecError> {
    let mut r = ByteReader::new(&node.payload);
    let server_id = r.read_u16_le()?;
    let mut item = Item::new(server_id);

    while !r.is_empty() {
        let Ok(attr) = r.read_u8() else { break };
        if attr == ATTR_TILE_FLAGS || !apply_item_attr(attr, &mut r, &mut item, dialect) {
            report.push(
                Warning::new(
                    WarningCode::UnknownAttribute,
                    format!("unknown ITEM attribute {attr:#04x}"),
                    WarningAction::Continued,
                )
                .maybe_position(position),
            );
            break;
        }
    }

    let Some(mut item) = resolve_item(item, position, catalog, config, report)? else {
        return Ok(None);
    };

    for child in &node.children {
        if child.node_type != NODE_ITEM {
            continue;
        }
        if let Some(child_item) = parse_item(child, dialect, catalog, config, position, report)? {
            item.children.push(child_item);
        }
    }

    Ok(Some(item))
}

trait MaybePosition {
    fn maybe_position(self, position: Option<Position>) -> Self;
}

impl MaybePosition for Warning {
    fn maybe_position(self, position: Option<Position>) -> Self {
        match position {
            Some(p) => self.with_position(p),
            None => self,
        }
    }
}

/// Applies one attribute/value pair to an item's fields. Returns `false`
/// for an attribute code this codec doesn't recognize.
fn apply_item_attr(attr: u8, r: &mut ByteReader<'_>, item: &mut Item, dialect: &Dialect) -> bool {
    match attr {
        ATTR_ACTION_ID => item.action_id = r.read_u16_le().ok(),
        ATTR_UNIQUE_ID => item.unique_id = r.read_u16_le().ok(),
        ATTR_SUBTYPE => {
            let raw = r.read_u16_le().unwrap_or(0);
            let value = if dialect.mask_subtype { (raw & 0x0F) as u8 } else { raw as u8 };
            item.subtype = Some(value);
        }
        ATTR_TEXT => item.text = r.read_string().ok(),
        ATTR_DESC => item.description = r.read_string().ok(),
        ATTR_TELE_DEST => {
            let x = r.read_u16_le().unwrap_or(0);
            let y = r.read_u16_le().unwrap_or(0);
            let z = r.read_u8().unwrap_or(0);
            item.destination = Some(Position::new(x, y, z));
        }
        ATTR_DEPOT_ID => item.depot_id = r.read_u16_le().ok(),
        ATTR_DOOR_ID => item.house_door_id = r.read_u8().ok(),
        _ => return false,
    }
    true
}

fn resolve_item<C: ItemCatalog>(
    mut item: Item,
    position: Option<Position>,
    catalog: &C,
    config: &LoaderConfig,
    report: &mut LoadReport,
) -> Result<Option<Item>, CodecError> {
    if catalog.server_to_client(item.server_id).is_some() {
        item.client_id = catalog.server_to_client(item.server_id);
        return Ok(Some(item));
    }

    use crate::config::UnknownItemPolicy::*;
    match config.unknown_item_policy {
        Placeholder => {
            let raw_id = item.server_id as u32;
            item.server_id = 0;
            item.client_id = None;
            report.push(
                Warning::new(
                    WarningCode::UnknownItemId,
                    format!("unknown item id {raw_id}, replaced with placeholder"),
                    WarningAction::Placeholder,
                )
                .with_raw_id(raw_id)
                .maybe_position(position),
            );
            Ok(Some(item))
        }
        Skip => {
            report.push(
                Warning::new(
                    WarningCode::UnknownItemId,
                    format!("unknown item id {}, skipped", item.server_id),
                    WarningAction::Skipped,
                )
                .with_raw_id(item.server_id as u32)
                .maybe_position(position),
            );
            Ok(None)
        }
        Error => Err(CodecError::UnknownItemId {
            server_id: item.server_id,
            position,
        }),
    }
}

fn parse_town(node: &DecodedNode) -> Town {
    let mut r = ByteReader::new(&node.payload);
    let id = r.read_u32_le().unwrap_or(0);
    let name = r.read_string().unwrap_or_default();
    let x = r.read_u16_le().unwrap_or(0);
    let y = r.read_u16_le().unwrap_or(0);
    let z = r.read_u8().unwrap_or(0);
    Town {
        id,
        name,
        temple_position: Position::new(x, y, z),
    }
}

fn parse_house(node: &DecodedNode, report: &mut LoadReport) -> House {
    let mut r = ByteReader::new(&node.payload);
    let id = r.read_u32_le().unwrap_or(0);
    let name = r.read_string().unwrap_or_default();

    let (town_id, rent, beds, entry_x, entry_y, entry_z) = match r.remaining() {
        11 => (
            r.read_u16_le().unwrap_or(0) as u32,
            r.read_u16_le().unwrap_or(0) as u32,
            r.read_u16_le().unwrap_or(0) as u8,
            r.read_u16_le().unwrap_or(0),
            r.read_u16_le().unwrap_or(0),
            r.read_u8().unwrap_or(0),
        ),
        17 => (
            r.read_u32_le().unwrap_or(0),
            r.read_u32_le().unwrap_or(0),
            r.read_u32_le().unwrap_or(0) as u8,
            r.read_u16_le().unwrap_or(0),
            r.read_u16_le().unwrap_or(0),
            r.read_u8().unwrap_or(0),
        ),
        other => {
            report.push(Warning::new(
                WarningCode::UnknownAttribute,
                format!("unrecognized HOUSE tail width ({other} bytes)"),
                WarningAction::Continued,
            ));
            (0, 0, 0, 0, 0, 0)
        }
    };

    House {
        id,
        name,
        entry: Some(Position::new(entry_x, entry_y, entry_z)),
        rent,
        guildhall: false,
        town_id,
        size: 0,
        client_id: 0,
        beds,
    }
}

fn parse_monster_area(node: &DecodedNode) -> MonsterSpawnArea {
    let (center, radius) = parse_spawn_area_header(node);
    let entries = node.children.iter().filter(|c| c.node_type == NODE_MONSTER).map(|c| parse_spawn_entry(c, &center)).collect();
    MonsterSpawnArea { center, radius, entries }
}

fn parse_npc_area(node: &DecodedNode) -> NpcSpawnArea {
    let (center, radius) = parse_spawn_area_header(node);
    let entries = node.children.iter().filter(|c| c.node_type == NODE_NPC).map(|c| parse_spawn_entry(c, &center)).collect();
    NpcSpawnArea { center, radius, entries }
}

fn parse_spawn_area_header(node: &DecodedNode) -> (Position, u32) {
    let mut r = ByteReader::new(&node.payload);
    let x = r.read_u16_le().unwrap_or(0);
    let y = r.read_u16_le().unwrap_or(0);
    let z = r.read_u8().unwrap_or(0);
    let radius = r.read_u32_le().unwrap_or(0);
    (Position::new(x, y, z), radius)
}

fn parse_spawn_entry(node: &DecodedNode, center: &Position) -> SpawnEntry {
    let mut r = ByteReader::new(&node.payload);
    let name = r.read_string().unwrap_or_default();
    let abs_x = r.read_u16_le().unwrap_or(center.x);
    let abs_y = r.read_u16_le().unwrap_or(center.y);
    let _abs_z = r.read_u8().unwrap_or(center.z);
    let spawntime = r.read_u32_le().unwrap_or(0);
    let (dx, dy) = Position::new(abs_x, abs_y, center.z).delta(center);

    let mut entry = SpawnEntry::new(name, dx, dy, spawntime);
    if r.read_u8().unwrap_or(0) == 1 {
        entry.direction = r.read_u8().ok();
    }
    if r.read_u8().unwrap_or(0) == 1 {
        entry.weight = r.read_u16_le().ok();
    }
    entry
}

// ---------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------

pub fn save_bytes(map: &MapModel, dialect: &Dialect) -> Vec<u8> {
    let mut out = ByteWriter::new();
    out.write_bytes(&dialect.magic);

    let mut root_payload = ByteWriter::new();
    root_payload.write_u32_le(map.header().format_version.max(SUPPORTED_VERSION));

    let root = DecodedNode {
        node_type: NODE_ROOT,
        payload: root_payload.into_inner(),
        children: vec![build_map_data(map, dialect)],
    };
    write_decoded_node(&mut out, &root);
    out.into_inner()
}

fn build_map_data(map: &MapModel, dialect: &Dialect) -> DecodedNode {
    let header = map.header();
    let mut payload = ByteWriter::new();
    payload.write_u16_le(header.width);
    payload.write_u16_le(header.height);
    if !header.spawnfile.is_empty() {
        payload.write_u8(ATTR_EXT_SPAWN_FILE);
        payload.write_string(&header.spawnfile);
    }
    if !header.housefile.is_empty() {
        payload.write_u8(ATTR_EXT_HOUSE_FILE);
        payload.write_string(&header.housefile);
    }
    if !header.zonefile.is_empty() {
        payload.write_u8(ATTR_EXT_ZONE_FILE);
        payload.write_string(&header.zonefile);
    }

    let mut children = Vec::new();
    if !header.description.is_empty() {
        children.push(DecodedNode {
            node_type: NODE_DESCRIPTION,
            payload: header.description.as_bytes().to_vec(),
            children: vec![],
        });
    }

    let mut tiles: Vec<&Tile> = map.iter_tiles().filter(|t| !t.is_empty()).collect();
    tiles.sort_by_key(|t| (t.position.z, t.position.y, t.position.x));
    children.push(DecodedNode {
        node_type: NODE_TILE_DATA,
        payload: vec![],
        children: tiles.into_iter().map(|t| build_tile(t, dialect)).collect(),
    });

    let monster_spawns: Vec<_> = map.iter_monster_spawns().collect();
    if !monster_spawns.is_empty() {
        children.push(DecodedNode {
            node_type: NODE_SPAWN_MONSTER_DATA,
            payload: vec![],
            children: monster_spawns
                .iter()
                .map(|a| build_spawn_area(NODE_SPAWN_MONSTER_AREA, NODE_MONSTER, &a.center, a.radius, &a.entries))
                .collect(),
        });
    }

    if dialect.has_npc_spawns {
        let npc_spawns: Vec<_> = map.iter_npc_spawns().collect();
        if !npc_spawns.is_empty() {
            children.push(DecodedNode {
                node_type: NODE_SPAWN_NPC_DATA,
                payload: vec![],
                children: npc_spawns
                    .iter()
                    .map(|a| build_spawn_area(NODE_SPAWN_NPC_AREA, NODE_NPC, &a.center, a.radius, &a.entries))
                    .collect(),
            });
        }
    }

    let mut towns: Vec<&Town> = map.iter_towns().collect();
    if !towns.is_empty() {
        towns.sort_by_key(|t| t.id);
        children.push(DecodedNode {
            node_type: NODE_TOWN_DATA,
            payload: vec![],
            children: towns.into_iter().map(build_town).collect(),
        });
    }

    let mut houses: Vec<&House> = map.iter_houses().collect();
    if !houses.is_empty() {
        houses.sort_by_key(|h| h.id);
        children.push(DecodedNode {
            node_type: NODE_HOUSE_DATA,
            payload: vec![],
            children: houses.into_iter().map(|h| build_house(h, dialect)).collect(),
        });
    }

    if dialect.has_waypoints {
        let mut waypoints: Vec<_> = map.iter_waypoints().collect();
        if !waypoints.is_empty() {
            waypoints.sort_by_key(|(name, _)| (*name).clone());
            children.push(DecodedNode {
                node_type: NODE_WAYPOINT_DATA,
                payload: vec![],
                children: waypoints
                    .into_iter()
                    .map(|(name, pos)| {
                        let mut p = ByteWriter::new();
                        p.write_string(name);
                        p.write_u16_le(pos.x);
                        p.write_u16_le(pos.y);
                        p.write_u8(pos.z);
                        DecodedNode {
                            node_type: NODE_WAYPOINT,
                            payload: p.into_inner(),
                            children: vec![],
                        }
                    })
                    .collect(),
            });
        }
    }

    DecodedNode {
        node_type: NODE_MAP_DATA,
        payload: payload.into_inner(),
        children,
    }
}

fn build_tile(tile: &Tile, dialect: &Dialect) -> DecodedNode {
    let mut payload = ByteWriter::new();
    payload.write_u16_le(tile.position.x);
    payload.write_u16_le(tile.position.y);
    payload.write_u8(tile.position.z);
    if let Some(house_id) = tile.house_id {
        payload.write_u32_le(house_id);
    }

    let inline_ground = tile.ground.as_ref().filter(|g| g.children.is_empty());
    payload.write_u16_le(inline_ground.map(|g| g.server_id).unwrap_or(0));
    if tile.map_flags != 0 {
        payload.write_u8(ATTR_TILE_FLAGS);
        payload.write_u32_le(tile.map_flags);
    }
    if let Some(ground) = inline_ground {
        write_item_attrs(&mut payload, ground, dialect);
    }

    let mut children = Vec::new();
    if let Some(ground) = tile.ground.as_ref().filter(|g| !g.children.is_empty()) {
        children.push(build_item(ground, dialect));
    }
    children.extend(tile.items.iter().map(|item| build_item(item, dialect)));

    DecodedNode {
        node_type: if tile.house_id.is_some() { NODE_HOUSETILE } else { NODE_TILE },
        payload: payload.into_inner(),
        children,
    }
}

fn build_item(item: &Item, dialect: &Dialect) -> DecodedNode {
    let mut payload = ByteWriter::new();
    payload.write_u16_le(item.server_id);
    write_item_attrs(&mut payload, item, dialect);

    DecodedNode {
        node_type: NODE_ITEM,
        payload: payload.into_inner(),
        children: item.children.iter().map(|c| build_item(c, dialect)).collect(),
    }
}

fn write_item_attrs(out: &mut ByteWriter, item: &Item, dialect: &Dialect) {
    if let Some(action_id) = item.action_id {
        out.write_u8(ATTR_ACTION_ID);
        out.write_u16_le(action_id);
    }
    if let Some(unique_id) = item.unique_id {
        out.write_u8(ATTR_UNIQUE_ID);
        out.write_u16_le(unique_id);
    }
    let subtype = item.subtype.or(item.count);
    if let Some(subtype) = subtype {
        if subtype > 0 {
            out.write_u8(ATTR_SUBTYPE);
            let value = if dialect.mask_subtype { (subtype & 0x0F) as u16 } else { subtype as u16 };
            out.write_u16_le(value);
        }
    }
    if let Some(text) = &item.text {
        out.write_u8(ATTR_TEXT);
        out.write_string(text);
    }
    if let Some(description) = &item.description {
        out.write_u8(ATTR_DESC);
        out.write_string(description);
    }
    if let Some(dest) = item.destination {
        out.write_u8(ATTR_TELE_DEST);
        out.write_u16_le(dest.x);
        out.write_u16_le(dest.y);
        out.write_u8(dest.z);
    }
    if let Some(depot_id) = item.depot_id {
        out.write_u8(ATTR_DEPOT_ID);
        out.write_u16_le(depot_id);
    }
    if let Some(door_id) = item.house_door_id {
        out.write_u8(ATTR_DOOR_ID);
        out.write_u8(door_id);
    }
}

fn build_town(town: &Town) -> DecodedNode {
    let mut payload = ByteWriter::new();
    payload.write_u32_le(town.id);
    payload.write_string(&town.name);
    payload.write_u16_le(town.temple_position.x);
    payload.write_u16_le(town.temple_position.y);
    payload.write_u8(town.temple_position.z);
    DecodedNode {
        node_type: NODE_TOWN,
        payload: payload.into_inner(),
        children: vec![],
    }
}

fn build_house(house: &House, dialect: &Dialect) -> DecodedNode {
    let mut payload = ByteWriter::new();
    payload.write_u32_le(house.id);
    payload.write_string(&house.name);
    let entry = house.entry.unwrap_or(Position::new(0, 0, 0));
    match dialect.house_tail {
        HouseTailWidth::Eleven => {
            payload.write_u16_le(house.town_id.min(u16::MAX as u32) as u16);
            payload.write_u16_le(house.rent.min(u16::MAX as u32) as u16);
            payload.write_u16_le(house.beds as u16);
        }
        HouseTailWidth::Seventeen => {
            payload.write_u32_le(house.town_id);
            payload.write_u32_le(house.rent);
            payload.write_u32_le(house.beds as u32);
        }
    }
    payload.write_u16_le(entry.x);
    payload.write_u16_le(entry.y);
    payload.write_u8(entry.z);

    DecodedNode {
        node_type: NODE_HOUSE,
        payload: payload.into_inner(),
        children: vec![],
    }
}

fn build_spawn_area(area_type: u8, entry_type: u8, center: &Position, radius: u32, entries: &[SpawnEntry]) -> DecodedNode {
    let mut payload = ByteWriter::new();
    payload.write_u16_le(center.x);
    payload.write_u16_le(center.y);
    payload.write_u8(center.z);
    payload.write_u32_le(radius);

    DecodedNode {
        node_type: area_type,
        payload: payload.into_inner(),
        children: entries.iter().map(|e| build_spawn_entry(entry_type, center, e)).collect(),
    }
}

fn build_spawn_entry(entry_type: u8, center: &Position, entry: &SpawnEntry) -> DecodedNode {
    let absolute = center.offset(entry.dx, entry.dy).unwrap_or(*center);
    let mut payload = ByteWriter::new();
    payload.write_string(&entry.name);
    payload.write_u16_le(absolute.x);
    payload.write_u16_le(absolute.y);
    payload.write_u8(center.z);
    payload.write_u32_le(entry.spawntime);
    match entry.direction {
        Some(direction) => {
            payload.write_u8(1);
            payload.write_u8(direction);
        }
        None => payload.write_u8(0),
    }
    match entry.weight {
        Some(weight) => {
            payload.write_u8(1);
            payload.write_u16_le(weight);
        }
        None => payload.write_u8(0),
    }

    DecodedNode {
        node_type: entry_type,
        payload: payload.into_inner(),
        children: vec![],
    }
}
