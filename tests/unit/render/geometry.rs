use super::*;

#[test]
fn rect_center_without_stroke() {
    let b = rect_box(AnchorMode::Center, 10.0, 10.0, 20.0, 20.0, 0.0);
    assert_eq!((b.left, b.bottom), (0.0, 0.0));
    assert_eq!((b.right(), b.top()), (20.0, 20.0));
}

#[test]
fn rect_modes() {
    let corner = rect_box(AnchorMode::Corner, 10.0, 20.0, 30.0, 40.0, 0.0);
    assert_eq!(
        corner,
        LogicalBox {
            left: 10.0,
            bottom: 20.0,
            width: 30.0,
            height: 40.0
        }
    );

    let radius = rect_box(AnchorMode::Radius, 50.0, 50.0, 10.0, 5.0, 0.0);
    assert_eq!((radius.left, radius.bottom), (40.0, 45.0));
    assert_eq!((radius.width, radius.height), (20.0, 10.0));

    let corners = rect_box(AnchorMode::Corners, 10.0, 10.0, 30.0, 50.0, 0.0);
    assert_eq!((corners.left, corners.bottom), (10.0, 10.0));
    assert_eq!((corners.right(), corners.top()), (30.0, 50.0));
}

#[test]
fn rect_stroke_insets_symmetrically() {
    let b = rect_box(AnchorMode::Corner, 0.0, 0.0, 20.0, 20.0, 4.0);
    assert_eq!((b.left, b.bottom), (2.0, 2.0));
    assert_eq!((b.right(), b.top()), (18.0, 18.0));
}

#[test]
fn to_surface_flips_y() {
    let b = LogicalBox {
        left: 0.0,
        bottom: 0.0,
        width: 20.0,
        height: 20.0,
    };
    assert_eq!(b.to_surface(100.0), Rect::new(0.0, 80.0, 20.0, 100.0));
    assert_eq!(flip_y(30.0, 100.0), 70.0);
}

#[test]
fn to_surface_normalizes_negative_sizes() {
    let b = LogicalBox {
        left: 10.0,
        bottom: 10.0,
        width: -5.0,
        height: -5.0,
    };
    assert_eq!(b.to_surface(100.0), Rect::new(5.0, 90.0, 10.0, 95.0));
}

#[test]
fn oriented_surface_box_keeps_negative_sizes() {
    let b = LogicalBox {
        left: 10.0,
        bottom: 10.0,
        width: -5.0,
        height: -5.0,
    };
    assert_eq!(b.to_surface_oriented(100.0), Rect::new(10.0, 95.0, 5.0, 90.0));

    let up = LogicalBox {
        width: 5.0,
        height: 5.0,
        ..b
    };
    assert_eq!(up.to_surface_oriented(100.0), up.to_surface(100.0));
}

#[test]
fn ellipse_modes() {
    let center = ellipse_geom(AnchorMode::Center, 50.0, 50.0, 20.0, 10.0, 0.0).unwrap();
    assert_eq!(center.center, Point::new(50.0, 50.0));
    assert_eq!(center.radii, Vec2::new(10.0, 5.0));

    let radius = ellipse_geom(AnchorMode::Radius, 50.0, 50.0, 20.0, 10.0, 0.0).unwrap();
    assert_eq!(radius.radii, Vec2::new(20.0, 10.0));

    let corner = ellipse_geom(AnchorMode::Corner, 0.0, 0.0, 20.0, 10.0, 0.0).unwrap();
    assert_eq!(corner.center, Point::new(10.0, 5.0));

    let corners = ellipse_geom(AnchorMode::Corners, 10.0, 10.0, 30.0, 50.0, 0.0).unwrap();
    assert_eq!(corners.center, Point::new(20.0, 30.0));
    assert_eq!(corners.radii, Vec2::new(10.0, 20.0));
}

#[test]
fn ellipse_stroke_shrinks_radii_and_rejects_negative() {
    let g = ellipse_geom(AnchorMode::Center, 0.0, 0.0, 20.0, 20.0, 2.0).unwrap();
    assert_eq!(g.radii, Vec2::new(8.0, 8.0));
    assert!(ellipse_geom(AnchorMode::Center, 0.0, 0.0, 2.0, 2.0, 5.0).is_none());
}

#[test]
fn sprite_modes() {
    let c = sprite_box(AnchorMode::Center, 50.0, 50.0, 20.0, 10.0);
    assert_eq!((c.left, c.bottom, c.width, c.height), (40.0, 45.0, 20.0, 10.0));
    let r = sprite_box(AnchorMode::Radius, 50.0, 50.0, 20.0, 10.0);
    assert_eq!((r.left, r.bottom, r.width, r.height), (30.0, 40.0, 40.0, 20.0));
    let k = sprite_box(AnchorMode::Corners, 10.0, 10.0, 30.0, 20.0);
    assert_eq!((k.left, k.bottom, k.width, k.height), (10.0, 10.0, 20.0, 10.0));
    let d = sprite_box(AnchorMode::Corner, 1.0, 2.0, 3.0, 4.0);
    assert_eq!((d.left, d.bottom, d.width, d.height), (1.0, 2.0, 3.0, 4.0));
}
