use chamber_core::{Chamber, LoadError, CHANNEL_STANDARD};
use chamber_field::VoxelData;
use chamber_geom::{Direction, Point3};
use chamber_tree::{Node, Property};

fn build_chamber() -> Chamber {
    let mut chamber = Chamber::new();
    chamber.set_title("Fixture Chamber");
    chamber.set_description("Round-trip fixture");
    chamber.set_timestamps(0x4F2E_77A1, 0x4F2E_9000);
    chamber.set_chamber_size(Point3::new(6, 6, 6));

    // Carve a room and mark one wall face non-portalable.
    chamber.field_mut().set_range(
        Point3::new(0, 0, 0),
        Point3::new(4, 4, 4),
        VoxelData::SOLID,
        VoxelData::SOLID,
    );
    chamber.field_mut().set_range(
        Point3::new(1, 1, 1),
        Point3::new(2, 2, 2),
        VoxelData::SOLID,
        VoxelData::empty(),
    );
    chamber
        .field_mut()
        .set_data(Point3::new(2, 2, 2), VoxelData::PORTAL_NEG_X, VoxelData::empty());

    let button = chamber.add_button();
    chamber.set_voxel_position(button, Point3::new(1, 1, 1));
    let panel = chamber.add_angled_panel();
    chamber.set_voxel_position(panel, Point3::new(2, 2, 1));
    chamber.set_panel_wall(panel, Direction::NegX);
    chamber.connect(button, panel, CHANNEL_STANDARD).unwrap();

    let cube = chamber.add_cube();
    chamber.set_voxel_position(cube, Point3::new(2, 1, 1));

    let barrier = chamber.add_barrier();
    chamber.set_voxel_position(barrier, Point3::new(3, 3, 1));
    chamber.set_barrier_facing(barrier, Direction::PosY);
    chamber.set_barrier_right(barrier, Direction::PosX);
    chamber.set_barrier_left_extent(barrier, 1);
    chamber.set_barrier_up_extent(barrier, 2);

    let hazard = chamber.add_barrier_hazard();
    chamber.set_voxel_position(hazard, Point3::new(1, 3, 1));
    chamber.set_hazard_wall(hazard, Direction::NegZ);
    chamber.set_hazard_right(hazard, Direction::PosY);
    chamber.set_hazard_pos_extent(hazard, 2);

    let piston = chamber.add_piston_platform();
    chamber.set_voxel_position(piston, Point3::new(4, 1, 1));
    chamber.set_piston_wall(piston, Direction::NegZ);
    chamber.set_piston_far_extent(piston, 3);

    let track = chamber.add_track_platform();
    chamber.set_voxel_position(track, Point3::new(4, 4, 1));
    chamber.connect(button, piston, CHANNEL_STANDARD).unwrap();

    chamber
}

#[test]
fn save_load_save_is_a_fixpoint() {
    let chamber = build_chamber();
    let first = chamber.to_text();
    let reloaded = Chamber::from_text(&first).unwrap();
    let second = reloaded.to_text();
    assert_eq!(first, second);
}

#[test]
fn reload_preserves_structure() {
    let chamber = build_chamber();
    let reloaded = Chamber::from_text(&chamber.to_text()).unwrap();

    assert_eq!(reloaded.title(), "Fixture Chamber");
    assert_eq!(reloaded.chamber_size(), Point3::new(6, 6, 6));
    assert_eq!(reloaded.item_count(), chamber.item_count());
    assert_eq!(reloaded.connection_count(), chamber.connection_count());

    // The voxel field reads back identically inside bounds.
    for x in 0..7 {
        for y in 0..7 {
            for z in 0..7 {
                let pos = Point3::new(x, y, z);
                assert_eq!(
                    reloaded.field().voxel(pos).data(),
                    chamber.field().voxel(pos).data(),
                    "at {pos}"
                );
            }
        }
    }

    // Composite roles re-resolve from the loaded connections.
    let (barrier_id, _) = reloaded
        .items()
        .find(|(_, item)| item.type_name() == "ITEM_BARRIER")
        .unwrap();
    let barrier = reloaded.barrier(barrier_id).unwrap();
    assert!(barrier.left().is_some());
    assert_eq!(barrier.left_offset(), 1);
    assert_eq!(barrier.up_offset(), 2);

    let (piston_id, _) = reloaded
        .items()
        .find(|(_, item)| item.type_name() == "ITEM_PISTON_PLATFORM")
        .unwrap();
    let piston = reloaded.piston_platform(piston_id).unwrap();
    assert_eq!(piston.far_offset(), 3);
    assert_eq!(piston.near_offset(), 0);
}

#[test]
fn unknown_item_types_round_trip_verbatim() {
    let chamber = build_chamber();
    let mut root = chamber.to_node();

    // Splice in an item type this library does not model.
    let mut alien = Node::new("Item");
    alien.push_property(Property::int("Index", 99));
    alien.push_property(Property::text("Type", "ITEM_TURRET"));
    alien.push_property(Property::bool("Deletable", true));
    alien.push_property(Property::point("VoxelPos", Point3::new(1, 2, 0)));
    alien.push_property(Property::text("LocalPos", "0 0 0"));
    alien.push_property(Property::point("Angles", Point3::ZERO));
    alien.push_property(Property::point("Facing", Point3::ZERO));
    alien.push_property(Property::text("ITEM_PROPERTY_TURRET_COUNT", "3"));
    if let Some(items) = root.node("Items") {
        let mut items = items.clone();
        items.push_node(alien);
        // Rebuild the root with the extended item list.
        let mut rebuilt = Node::new(root.key.clone());
        for entry in &root.entries {
            match entry {
                chamber_tree::Entry::Node(n) if n.key == "Items" => {
                    rebuilt.push_node(items.clone())
                }
                other => rebuilt.entries.push(other.clone()),
            }
        }
        root = rebuilt;
    }

    let reloaded = Chamber::from_node(&root).unwrap();
    let (_, turret) = reloaded
        .items()
        .find(|(_, item)| item.type_name() == "ITEM_TURRET")
        .unwrap();
    assert_eq!(
        turret.extra_properties(),
        &[("ITEM_PROPERTY_TURRET_COUNT".to_string(), "3".to_string())]
    );

    // And it survives another save/load unchanged.
    let again = Chamber::from_text(&reloaded.to_text()).unwrap();
    let (_, turret) = again
        .items()
        .find(|(_, item)| item.type_name() == "ITEM_TURRET")
        .unwrap();
    assert_eq!(turret.extra_properties().len(), 1);
}

#[test]
fn connection_to_unknown_index_aborts_the_load() {
    let chamber = build_chamber();
    let mut root = chamber.to_node();

    let mut bogus = Node::new("Connection");
    bogus.push_property(Property::int("Sender", 500));
    bogus.push_property(Property::int("Receiver", 0));
    bogus.push_property(Property::text("Type", CHANNEL_STANDARD));
    if let Some(connections) = root.entries.iter_mut().find_map(|entry| match entry {
        chamber_tree::Entry::Node(n) if n.key == "Connections" => Some(n),
        _ => None,
    }) {
        connections.push_node(bogus);
    }

    assert!(matches!(
        Chamber::from_node(&root),
        Err(LoadError::UnknownItemIndex(500))
    ));
}

#[test]
fn header_mismatches_abort_the_load() {
    let chamber = build_chamber();
    let text = chamber.to_text();

    let wrong_app = text.replacen("\"AppID\"\t\t\"644\"", "\"AppID\"\t\t\"999\"", 1);
    assert!(matches!(
        Chamber::from_text(&wrong_app),
        Err(LoadError::AppIdMismatch { found: 999, .. })
    ));

    let wrong_version = text.replacen("\"Version\"\t\t\"12\"", "\"Version\"\t\t\"13\"", 1);
    assert!(matches!(
        Chamber::from_text(&wrong_version),
        Err(LoadError::VersionMismatch { found: 13, .. })
    ));
}

#[test]
fn missing_required_properties_abort_the_load() {
    let text = "\"portal2_puzzle\"\n{\n\"AppID\"\t\t\"644\"\n\"Version\"\t\t\"12\"\n}\n";
    assert!(matches!(
        Chamber::from_text(text),
        Err(LoadError::Tree(_))
    ));
}

#[test]
fn loaded_file_parses_from_the_text_grammar() {
    // A minimal hand-written file exercises the reader end to end.
    let text = concat!(
        "\"portal2_puzzle\"\n{\n",
        "\t\"AppID\"\t\t\"644\"\n",
        "\t\"Version\"\t\t\"12\"\n",
        "\t\"FileID\"\t\t\"0x0000000000000000\"\n",
        "\t\"Timestamp_Created\"\t\t\"0x000000004F2E77A1\"\n",
        "\t\"Timestamp_Modified\"\t\t\"0x000000004F2E77A1\"\n",
        "\t\"CompileTime\"\t\t\"15.000000\"\n",
        "\t\"Title\"\t\t\"Tiny\"\n",
        "\t\"Description\"\t\t\"\"\n",
        "\t\"PreviewDirty\"\t\t\"0\"\n",
        "\t\"ChamberSize\"\t\t\"3 3 3\"\n",
        "\t\"Voxels\"\n\t{\n",
        "\t\t\"Voxel\"\n\t\t{\n",
        "\t\t\t\"Position\"\t\t\"1 1 1\"\n",
        "\t\t\t\"Solid\"\t\t\"1\"\n",
        "\t\t\t\"Portal0\"\t\t\"0\"\n",
        "\t\t\t\"Portal1\"\t\t\"1\"\n",
        "\t\t\t\"Portal2\"\t\t\"1\"\n",
        "\t\t}\n",
        "\t}\n",
        "}\n"
    );
    let chamber = Chamber::from_text(text).unwrap();
    assert_eq!(chamber.chamber_size(), Point3::new(3, 3, 3));
    let voxel = chamber.field().voxel(Point3::new(1, 1, 1));
    assert!(voxel.is_solid());
    assert!(!voxel.is_portalable_neg_x());
    assert!(voxel.is_portalable_neg_y());
    // Unlisted interior cells decode to the open default.
    assert!(!chamber.field().voxel(Point3::new(1, 1, 2)).is_solid());
}
