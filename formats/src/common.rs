//! Common code, mostly small `nom` parsers shared by the codecs.
//!

use nom::bytes::complete::take_while_m_n;
use nom::combinator::map_res;
use nom::IResult;

/// Parse exactly `n` ASCII digits as a number.
///
#[inline]
fn fixed_digits(input: &str, n: usize) -> IResult<&str, u32> {
    map_res(take_while_m_n(n, n, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u32>()
    })(input)
}

pub(crate) fn two_digits(input: &str) -> IResult<&str, u32> {
    fixed_digits(input, 2)
}

pub(crate) fn three_digits(input: &str) -> IResult<&str, u32> {
    fixed_digits(input, 3)
}

pub(crate) fn four_digits(input: &str) -> IResult<&str, u32> {
    fixed_digits(input, 4)
}
