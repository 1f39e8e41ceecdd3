use camits_core::error::CamItsError;
use camits_core::raw::cfa::{
    compose_orders, gains_in_canonical_order, inverse_order, reorder, CfaArrangement,
};

#[test]
fn test_from_code() {
    for (code, cfa) in CfaArrangement::ALL.iter().enumerate() {
        assert_eq!(CfaArrangement::from_code(code as u8).unwrap(), *cfa);
    }
    assert!(matches!(
        CfaArrangement::from_code(4),
        Err(CamItsError::UnsupportedCfa(4))
    ));
}

#[test]
fn test_canonical_orders() {
    assert_eq!(CfaArrangement::RGGB.canonical_order(), [0, 1, 2, 3]);
    assert_eq!(CfaArrangement::GRBG.canonical_order(), [1, 0, 3, 2]);
    assert_eq!(CfaArrangement::GBRG.canonical_order(), [2, 3, 0, 1]);
    assert_eq!(CfaArrangement::BGGR.canonical_order(), [3, 2, 1, 0]);
}

#[test]
fn test_canonical_order_picks_named_colors() {
    // Physical 2x2 cells, row-major.
    let cells = [
        (CfaArrangement::RGGB, ["R", "Gr", "Gb", "B"]),
        (CfaArrangement::GRBG, ["Gr", "R", "B", "Gb"]),
        (CfaArrangement::GBRG, ["Gb", "B", "R", "Gr"]),
        (CfaArrangement::BGGR, ["B", "Gb", "Gr", "R"]),
    ];
    for (cfa, cell) in cells {
        assert_eq!(
            reorder(&cell, cfa.canonical_order()),
            ["R", "Gr", "Gb", "B"],
            "{cfa:?}"
        );
    }
}

#[test]
fn test_inverse_restores_physical_order() {
    let values = [10, 20, 30, 40];
    for cfa in CfaArrangement::ALL {
        let order = cfa.canonical_order();
        let canonical = reorder(&values, order);
        assert_eq!(reorder(&canonical, inverse_order(order)), values, "{cfa:?}");
    }
}

#[test]
fn test_inverse_of_non_involution() {
    let order = [1, 2, 3, 0];
    let inv = inverse_order(order);
    assert_eq!(inv, [3, 0, 1, 2]);
    assert_eq!(compose_orders(order, inv), [0, 1, 2, 3]);
}

#[test]
fn test_compose_matches_sequential_reorder() {
    let values = ['a', 'b', 'c', 'd'];
    let first = [2, 0, 3, 1];
    let second = [1, 3, 0, 2];
    let sequential = reorder(&reorder(&values, first), second);
    assert_eq!(reorder(&values, compose_orders(first, second)), sequential);
}

#[test]
fn test_identity_composition() {
    let identity = [0, 1, 2, 3];
    for cfa in CfaArrangement::ALL {
        let order = cfa.canonical_order();
        assert_eq!(compose_orders(order, identity), order);
        assert_eq!(compose_orders(identity, order), order);
    }
}

#[test]
fn test_gains_follow_even_green() {
    let gains = [2.0, 1.1, 1.2, 1.5];
    assert_eq!(gains_in_canonical_order(CfaArrangement::RGGB, gains), gains);
    assert_eq!(gains_in_canonical_order(CfaArrangement::GRBG, gains), gains);
    assert_eq!(
        gains_in_canonical_order(CfaArrangement::GBRG, gains),
        [2.0, 1.2, 1.1, 1.5]
    );
    assert_eq!(
        gains_in_canonical_order(CfaArrangement::BGGR, gains),
        [2.0, 1.2, 1.1, 1.5]
    );
}
