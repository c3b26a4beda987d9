//! Integration tests exercising the four public query entry points together
//! against a single hand-built tree whose SW quadrant is further subdivided.

use boxwalk::tree::HAS_CHILDREN;
use boxwalk::{area_query, find_peer_lists, leaves_to_balls, space_invader_query, Tree};
use tracing::info;

/// A depth-2 quadtree whose SW level-1 quadrant is further split.
fn split_sw_again_2d() -> Tree<f64> {
    let mut centers_x = vec![0.5, 0.25, 0.25, 0.75, 0.75];
    let mut centers_y = vec![0.5, 0.25, 0.75, 0.25, 0.75];
    let mut levels = vec![0, 1, 1, 1, 1];
    let mut flags = vec![HAS_CHILDREN, HAS_CHILDREN, 0, 0, 0];

    centers_x.extend([0.125, 0.125, 0.375, 0.375]);
    centers_y.extend([0.125, 0.375, 0.125, 0.375]);
    levels.extend([2, 2, 2, 2]);
    flags.extend([0, 0, 0, 0]);

    let child_ids = vec![
        vec![1, 5, 0, 0, 0, 0, 0, 0, 0],
        vec![2, 6, 0, 0, 0, 0, 0, 0, 0],
        vec![3, 7, 0, 0, 0, 0, 0, 0, 0],
        vec![4, 8, 0, 0, 0, 0, 0, 0, 0],
    ];
    Tree::new(2, 2, 1.0, vec![0.0, 0.0], vec![centers_x, centers_y], levels, flags, child_ids)
}

#[test]
fn test_peer_lists_reused_across_area_query_and_siq() {
    info!("building tree and peer lists once, reusing across all four entry points");
    let tree = split_sw_again_2d();
    let lookup = find_peer_lists(&tree).unwrap();

    let centers = vec![vec![0.25, 0.1], vec![0.25, 0.1]];
    let radii = vec![0.3, 0.05];

    let aq = area_query(&tree, &centers, &radii, Some(&lookup)).unwrap();
    let mut leaves_0 = aq.leaves_of(0).to_vec();
    leaves_0.sort_unstable();
    assert_eq!(leaves_0, vec![2, 3, 4, 5, 6, 7, 8]);

    let mut leaves_1 = aq.leaves_of(1).to_vec();
    leaves_1.sort_unstable();
    assert_eq!(leaves_1, vec![5]);

    let lbl = leaves_to_balls(&tree, &centers, &radii, Some(&lookup)).unwrap();
    assert_eq!(lbl.balls_of(5), &[0, 1]);
    assert!(lbl.balls_of(6).contains(&0));
    assert!(lbl.balls_of(0).is_empty(), "root is never a leaf hit");

    let siq = space_invader_query(&tree, &centers, &radii, Some(&lookup)).unwrap();
    for &leaf in &[2usize, 3, 4, 5, 6, 7, 8] {
        assert!(siq[leaf] > 0.0, "leaf {leaf} should have a nonzero reduced distance");
    }
}

#[test]
fn test_entry_points_agree_whether_peer_lists_are_supplied_or_not() {
    let tree = split_sw_again_2d();
    let centers = vec![vec![0.25], vec![0.25]];
    let radii = vec![0.3];

    let with_lookup = {
        let lookup = find_peer_lists(&tree).unwrap();
        area_query(&tree, &centers, &radii, Some(&lookup)).unwrap()
    };
    let without = area_query(&tree, &centers, &radii, None).unwrap();

    let mut a = with_lookup.leaves_of(0).to_vec();
    let mut b = without.leaves_of(0).to_vec();
    a.sort_unstable();
    b.sort_unstable();
    assert_eq!(a, b);
}

#[test]
fn test_peer_list_lookup_and_area_query_result_round_trip_through_bincode() -> anyhow::Result<()> {
    let tree = split_sw_again_2d();
    let lookup = find_peer_lists(&tree).unwrap();

    let encoded: Vec<u8> = bincode::serialize(&lookup)?;
    let decoded: boxwalk::PeerListLookup = bincode::deserialize(&encoded[..])?;
    assert_eq!(decoded.peer_list_starts, lookup.peer_list_starts);
    assert_eq!(decoded.peer_lists, lookup.peer_lists);

    let centers = vec![vec![0.25], vec![0.25]];
    let radii = vec![0.3];
    let aq = area_query(&tree, &centers, &radii, Some(&lookup))?;
    let encoded_aq: Vec<u8> = bincode::serialize(&aq)?;
    let decoded_aq: boxwalk::AreaQueryResult = bincode::deserialize(&encoded_aq[..])?;
    assert_eq!(decoded_aq.leaves_of(0), aq.leaves_of(0));

    Ok(())
}
