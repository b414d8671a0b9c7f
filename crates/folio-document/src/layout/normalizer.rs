// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Position normalisation — converts caller positions to points, resolves
// alignment, and enforces the drawable limits of the active page.
//
// The returned anchor is the top-left corner of the content in PDF's
// bottom-origin frame. Content extends right by its width and down by its
// height from there. Nothing here draws; every violation is reported before
// the caller touches the canvas.

use folio_core::align;
use folio_core::error::FolioError;
use folio_core::units::{self, Unit};
use folio_core::{Alignment, PageGeometry, Position};

/// A validated position in points, bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

/// Normalise a bare point (line endpoints).
pub fn normalize_point(
    geometry: &PageGeometry,
    unit: Unit,
    position: Position,
) -> Result<Anchor, FolioError> {
    normalize_box(geometry, unit, position, 0.0, 0.0)
}

/// Normalise the top-left corner of a box `width` x `height` points.
pub fn normalize_box(
    geometry: &PageGeometry,
    unit: Unit,
    position: Position,
    width: f64,
    height: f64,
) -> Result<Anchor, FolioError> {
    check_position(position)?;
    check_extent("width", width)?;
    check_extent("height", height)?;
    let x = units::to_points(unit, position.line);
    let y = geometry.column_normalize(units::to_points(unit, position.column));
    verify_column(geometry, unit, y, height)?;
    verify_line(geometry, unit, x, width)?;
    Ok(Anchor { x, y })
}

/// Normalise a text anchor given the measured text size in points.
///
/// Alignment shifts the anchor by the full text width. For centred text the
/// right-hand check covers the half beyond the centre, so the right edge is
/// `centre + width / 2` whichever way it is computed.
pub fn normalize_text(
    geometry: &PageGeometry,
    unit: Unit,
    position: Position,
    alignment: Alignment,
    text_width: f64,
    text_height: f64,
) -> Result<Anchor, FolioError> {
    check_position(position)?;
    check_extent("text width", text_width)?;
    check_extent("text height", text_height)?;
    let line = units::to_points(unit, position.line);
    let x = align::resolve(alignment, line, text_width);
    let y = geometry.column_normalize(units::to_points(unit, position.column));
    verify_column(geometry, unit, y, text_height)?;
    match alignment {
        Alignment::Center => {
            verify_line(geometry, unit, x, 0.0)?;
            verify_right_edge(geometry, unit, x, line + text_width / 2.0)?;
        }
        Alignment::Left | Alignment::Right => verify_line(geometry, unit, x, text_width)?,
    }
    Ok(Anchor { x, y })
}

fn check_position(position: Position) -> Result<(), FolioError> {
    check_finite("line", position.line)?;
    check_finite("column", position.column)
}

fn check_finite(name: &'static str, value: f64) -> Result<(), FolioError> {
    if !value.is_finite() {
        return Err(FolioError::NonFiniteValue { name, value });
    }
    Ok(())
}

fn check_extent(name: &'static str, value: f64) -> Result<(), FolioError> {
    check_finite(name, value)?;
    if value < 0.0 {
        return Err(FolioError::NegativeValue { name, value });
    }
    Ok(())
}

/// `y` is bottom-origin. Reported values are flipped back to the caller's
/// top-down frame and unit.
fn verify_column(
    geometry: &PageGeometry,
    unit: Unit,
    y: f64,
    height: f64,
) -> Result<(), FolioError> {
    let limits = geometry.limits();
    let caller = |points: f64| units::from_points(unit, geometry.column_normalize(points));

    if y > limits.start_column {
        return Err(FolioError::OutOfRangeColumn {
            value: caller(y),
            limit: caller(limits.start_column),
            unit,
        });
    }
    if y < limits.end_column {
        return Err(FolioError::OutOfRangeColumn {
            value: caller(y),
            limit: caller(limits.end_column),
            unit,
        });
    }
    if y - height < limits.end_column {
        return Err(FolioError::OutOfRangeColumnWithHeight {
            value: caller(y),
            limit: caller(limits.end_column),
            unit,
        });
    }
    Ok(())
}

fn verify_line(
    geometry: &PageGeometry,
    unit: Unit,
    x: f64,
    width: f64,
) -> Result<(), FolioError> {
    let limits = geometry.limits();
    let caller = |points: f64| units::from_points(unit, points);

    if x < limits.start_line {
        return Err(FolioError::OutOfRangeLine {
            value: caller(x),
            limit: caller(limits.start_line),
            unit,
        });
    }
    if x > limits.end_line {
        return Err(FolioError::OutOfRangeLine {
            value: caller(x),
            limit: caller(limits.end_line),
            unit,
        });
    }
    verify_right_edge(geometry, unit, x, x + width)
}

/// Content starting at `x` must end (`right`) on or before the right limit.
fn verify_right_edge(
    geometry: &PageGeometry,
    unit: Unit,
    x: f64,
    right: f64,
) -> Result<(), FolioError> {
    let end_line = geometry.limits().end_line;
    if right > end_line {
        return Err(FolioError::OutOfRangeLineWithWidth {
            value: units::from_points(unit, x),
            limit: units::from_points(unit, end_line),
            unit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::PageSpacing;

    /// 600 x 800 pt page with 20 pt margins all round.
    fn geometry() -> PageGeometry {
        PageGeometry::new(600.0, 800.0, PageSpacing::uniform(20.0))
    }

    #[test]
    fn column_at_top_limit_is_accepted() {
        let anchor = normalize_text(
            &geometry(),
            Unit::Point,
            Position::new(20.0, 20.0),
            Alignment::Left,
            50.0,
            10.0,
        )
        .expect("inside limits");
        assert_eq!(anchor.y, geometry().limits().start_column);
        assert_eq!(anchor.x, 20.0);
    }

    #[test]
    fn one_point_above_top_limit_fails() {
        let err = normalize_text(
            &geometry(),
            Unit::Point,
            Position::new(20.0, 19.0),
            Alignment::Left,
            50.0,
            10.0,
        )
        .unwrap_err();
        match err {
            FolioError::OutOfRangeColumn { value, limit, unit } => {
                assert_eq!(value, 19.0);
                assert_eq!(limit, 20.0);
                assert_eq!(unit, Unit::Point);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn below_bottom_limit_fails() {
        let err = normalize_point(&geometry(), Unit::Point, Position::new(100.0, 790.0)).unwrap_err();
        assert!(matches!(err, FolioError::OutOfRangeColumn { limit, .. } if limit == 780.0));
    }

    #[test]
    fn content_height_past_bottom_fails() {
        let err = normalize_box(&geometry(), Unit::Point, Position::new(100.0, 770.0), 10.0, 20.0)
            .unwrap_err();
        assert!(matches!(err, FolioError::OutOfRangeColumnWithHeight { value, .. } if value == 770.0));
    }

    #[test]
    fn left_of_margin_fails() {
        let err = normalize_point(&geometry(), Unit::Point, Position::new(10.0, 100.0)).unwrap_err();
        assert!(matches!(err, FolioError::OutOfRangeLine { limit, .. } if limit == 20.0));
    }

    #[test]
    fn right_of_margin_fails() {
        let err = normalize_point(&geometry(), Unit::Point, Position::new(590.0, 100.0)).unwrap_err();
        assert!(matches!(err, FolioError::OutOfRangeLine { limit, .. } if limit == 580.0));
    }

    #[test]
    fn width_past_right_margin_fails() {
        let err = normalize_box(&geometry(), Unit::Point, Position::new(500.0, 100.0), 100.0, 10.0)
            .unwrap_err();
        assert!(matches!(err, FolioError::OutOfRangeLineWithWidth { .. }));
    }

    #[test]
    fn right_alignment_checks_full_width() {
        // Right-aligned at 100 with width 100 starts exactly at 0 < margin.
        let err = normalize_text(
            &geometry(),
            Unit::Point,
            Position::new(100.0, 100.0),
            Alignment::Right,
            100.0,
            10.0,
        )
        .unwrap_err();
        assert!(matches!(err, FolioError::OutOfRangeLine { .. }));

        let anchor = normalize_text(
            &geometry(),
            Unit::Point,
            Position::new(580.0, 100.0),
            Alignment::Right,
            100.0,
            10.0,
        )
        .expect("ends on the right margin");
        assert_eq!(anchor.x, 480.0);
    }

    #[test]
    fn centre_alignment_checks_half_beyond_centre() {
        // Centred on the right margin: the right half would stick out.
        let err = normalize_text(
            &geometry(),
            Unit::Point,
            Position::new(580.0, 100.0),
            Alignment::Center,
            100.0,
            10.0,
        )
        .unwrap_err();
        match err {
            FolioError::OutOfRangeLineWithWidth { value, limit, .. } => {
                assert_eq!(value, 530.0);
                assert_eq!(limit, 580.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Centre 530 plus half of 100 ends exactly on the margin.
        let anchor = normalize_text(
            &geometry(),
            Unit::Point,
            Position::new(530.0, 100.0),
            Alignment::Center,
            100.0,
            10.0,
        )
        .expect("right half fits");
        assert_eq!(anchor.x, 480.0);
    }

    #[test]
    fn centred_text_past_left_margin_fails() {
        let err = normalize_text(
            &geometry(),
            Unit::Point,
            Position::new(60.0, 100.0),
            Alignment::Center,
            100.0,
            10.0,
        )
        .unwrap_err();
        assert!(matches!(err, FolioError::OutOfRangeLine { limit, .. } if limit == 20.0));
    }

    #[test]
    fn column_is_flipped_to_bottom_origin() {
        let anchor = normalize_point(&geometry(), Unit::Point, Position::new(100.0, 300.0))
            .expect("inside");
        assert_eq!(anchor.y, 500.0);
    }

    #[test]
    fn millimetres_are_converted() {
        let anchor = normalize_point(&geometry(), Unit::Millimeter, Position::new(10.0, 10.0))
            .expect("inside");
        assert_eq!(anchor.x, 28.35);
        assert_eq!(anchor.y, 800.0 - 28.35);
    }

    #[test]
    fn negative_extent_is_rejected() {
        let err = normalize_box(&geometry(), Unit::Point, Position::new(100.0, 100.0), -1.0, 10.0)
            .unwrap_err();
        assert!(matches!(err, FolioError::NegativeValue { name: "width", .. }));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let nan = Position::new(f64::NAN, f64::NAN);
        assert!(matches!(
            normalize_text(&geometry(), Unit::Point, nan, Alignment::Left, 10.0, 10.0),
            Err(FolioError::NonFiniteValue { name: "line", .. })
        ));
        assert!(matches!(
            normalize_point(&geometry(), Unit::Point, Position::new(100.0, f64::INFINITY)),
            Err(FolioError::NonFiniteValue { name: "column", .. })
        ));
        assert!(matches!(
            normalize_box(&geometry(), Unit::Point, Position::new(100.0, 100.0), f64::NAN, 10.0),
            Err(FolioError::NonFiniteValue { name: "width", .. })
        ));
        assert!(matches!(
            normalize_text(
                &geometry(),
                Unit::Point,
                Position::new(100.0, 100.0),
                Alignment::Center,
                10.0,
                f64::NAN,
            ),
            Err(FolioError::NonFiniteValue { name: "text height", .. })
        ));
    }
}
