use crate::base::{Error, Result};
use crate::internals::GLK_CRYSTAL_HZ;
use crate::types::DisplayGeometry;
use log::trace;
use std::fmt::Display;
use std::ops::RangeInclusive;

/// Legal divisors for the non-standard baud rate command.
pub const GLK_NON_STANDARD_BAUD_DIVISOR: RangeInclusive<u16> = 12..=2047;

/// Computes the non-standard baud rate divisor for `desired_baud`.
///
/// `speed = 16_000_000 / (8 * desired_baud) - 1`, rejected unless it lands in
/// `12..=2047`: a divisor outside that range can leave the module unreachable.
///
/// ```
/// assert_eq!(glk::utils::non_standard_baud_divisor(19200).unwrap(), 103);
/// ```
pub fn non_standard_baud_divisor(desired_baud: u32) -> Result<u16> {
    trace!("Computing baud divisor for {} bps", desired_baud);
    let divisor = (GLK_CRYSTAL_HZ / 8)
        .checked_div(desired_baud)
        .and_then(|d| d.checked_sub(1))
        .and_then(|d| u16::try_from(d).ok())
        .filter(|d| GLK_NON_STANDARD_BAUD_DIVISOR.contains(d));
    divisor.ok_or_else(|| Error::InvalidParameter {
        name: "baud",
        description: format!(
            "{} bps does not give a divisor within {}..={}",
            desired_baud,
            GLK_NON_STANDARD_BAUD_DIVISOR.start(),
            GLK_NON_STANDARD_BAUD_DIVISOR.end()
        ),
    })
}

/// Fails with `InvalidParameter` unless `value` lies in `range`.
pub fn check_range<T>(name: &'static str, value: T, range: RangeInclusive<T>) -> Result<T>
where
    T: PartialOrd + Display + Copy,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            name,
            description: format!(
                "{} is outside {}..={}",
                value,
                range.start(),
                range.end()
            ),
        })
    }
}

/// Checks a pixel coordinate against the panel size.
pub fn check_point(
    geometry: &DisplayGeometry,
    x: (&'static str, u8),
    y: (&'static str, u8),
) -> Result<()> {
    check_range(x.0, x.1, 0..=geometry.max_x())?;
    check_range(y.0, y.1, 0..=geometry.max_y())?;
    Ok(())
}

/// Checks a rectangle: both corners on the panel, first corner top-left of the second.
pub fn check_rect(geometry: &DisplayGeometry, x1: u8, y1: u8, x2: u8, y2: u8) -> Result<()> {
    check_point(geometry, ("x1", x1), ("y1", y1))?;
    check_point(geometry, ("x2", x2), ("y2", y2))?;
    if x1 > x2 {
        return Err(Error::InvalidParameter {
            name: "x1",
            description: format!("x1 {} is right of x2 {}", x1, x2),
        });
    }
    if y1 > y2 {
        return Err(Error::InvalidParameter {
            name: "y1",
            description: format!("y1 {} is below y2 {}", y1, y2),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(19200, 103)]
    #[case(9600, 207)]
    #[case(1000, 1999)]
    fn baud_divisor(#[case] baud: u32, #[case] divisor: u16) {
        assert_eq!(non_standard_baud_divisor(baud).unwrap(), divisor);
    }

    #[rstest]
    #[case(0)]
    #[case(500)]
    #[case(1_000_000)]
    fn baud_divisor_out_of_range(#[case] baud: u32) {
        assert!(matches!(
            non_standard_baud_divisor(baud),
            Err(Error::InvalidParameter { name: "baud", .. })
        ));
    }

    #[test]
    fn range_message() {
        match check_range("minutes", 91u8, 0..=90) {
            Err(Error::InvalidParameter { name, description }) => {
                assert_eq!(name, "minutes");
                assert_eq!(description, "91 is outside 0..=90");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rect_corners_must_be_ordered() {
        let geometry = DisplayGeometry::default();
        assert!(check_rect(&geometry, 0, 0, 191, 63).is_ok());
        assert!(check_rect(&geometry, 5, 5, 5, 5).is_ok());
        assert!(matches!(
            check_rect(&geometry, 10, 0, 9, 5),
            Err(Error::InvalidParameter { name: "x1", .. })
        ));
        assert!(matches!(
            check_rect(&geometry, 0, 6, 9, 5),
            Err(Error::InvalidParameter { name: "y1", .. })
        ));
        assert!(matches!(
            check_rect(&geometry, 0, 0, 192, 5),
            Err(Error::InvalidParameter { name: "x2", .. })
        ));
    }
}
