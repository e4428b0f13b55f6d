/// nom building blocks shared by the OBJ and MTL parsers
use nom::{
    bytes::complete::{tag, take_till1},
    character::complete::{char, i64 as index, multispace0, multispace1},
    combinator::{all_consuming, map},
    multi::separated_list1,
    number::complete::float,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use std::io::{self, BufRead};

use crate::geometry::FaceVertexRef;

/// Feed each line of `reader` to `handle`, decoding invalid UTF-8 lossily so
/// a single bad byte never aborts a load
pub fn for_each_line<R, E, F>(mut reader: R, mut handle: F) -> Result<(), E>
where
    R: BufRead,
    E: From<io::Error>,
    F: FnMut(&str) -> Result<(), E>,
{
    let mut raw = Vec::new();
    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            return Ok(());
        }
        handle(&String::from_utf8_lossy(&raw))?;
    }
}

/// Split a line into its directive keyword and the remaining arguments.
/// Anything from `#` to the end of the line is a comment.
pub fn directive(line: &str) -> Option<(&str, &str)> {
    let line = match line.split_once('#') {
        Some((code, _)) => code,
        None => line,
    };
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let parsed: IResult<&str, &str> = take_till1(|c: char| c.is_whitespace())(line);
    parsed.ok().map(|(rest, keyword)| (keyword, rest))
}

/// First whitespace-delimited token of the arguments
pub fn first_token(args: &str) -> Option<&str> {
    args.split_whitespace().next()
}

pub fn vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, x) = preceded(multispace0, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, (x, y, z)))
}

pub fn vector2(input: &str) -> IResult<&str, (f32, f32)> {
    let (input, u) = preceded(multispace0, float)(input)?;
    let (input, v) = preceded(multispace1, float)(input)?;
    Ok((input, (u, v)))
}

pub fn scalar(input: &str) -> IResult<&str, f32> {
    preceded(multispace0, float)(input)
}

/// `v/vt/vn`
fn corner_full(input: &str) -> IResult<&str, FaceVertexRef> {
    map(
        tuple((index, char('/'), index, char('/'), index)),
        |(v, _, vt, _, vn)| FaceVertexRef::from_obj(v, Some(vn), Some(vt)),
    )(input)
}

/// `v//vn`
fn corner_without_texcoord(input: &str) -> IResult<&str, FaceVertexRef> {
    map(tuple((index, tag("//"), index)), |(v, _, vn)| {
        FaceVertexRef::from_obj(v, Some(vn), None)
    })(input)
}

/// bare `v`
fn corner_bare(input: &str) -> IResult<&str, FaceVertexRef> {
    map(index, |v| FaceVertexRef::from_obj(v, None, None))(input)
}

fn corners_with<'a>(
    corner: fn(&'a str) -> IResult<&'a str, FaceVertexRef>,
    input: &'a str,
) -> Option<Vec<FaceVertexRef>> {
    let parsed: IResult<&str, Vec<FaceVertexRef>> = all_consuming(delimited(
        multispace0,
        separated_list1(multispace1, corner),
        multispace0,
    ))(input);
    parsed.ok().map(|(_, corners)| corners)
}

/// Parse the corners of an `f` line.
///
/// Every corner must use the same format; formats are tried in the order
/// `v/vt/vn`, `v//vn`, `v`. Mixed or unknown formats yield `None`.
pub fn face_corners(args: &str) -> Option<Vec<FaceVertexRef>> {
    corners_with(corner_full, args)
        .or_else(|| corners_with(corner_without_texcoord, args))
        .or_else(|| corners_with(corner_bare, args))
}

/// Last token of a texture map directive, skipping any leading options
pub fn map_file_name(args: &str) -> Option<&str> {
    args.split_whitespace().last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_each_line_is_lossy() {
        let input: &[u8] = b"v 1 2 3\nusemtl caf\xe9\n\nlast";
        let mut lines = Vec::new();
        for_each_line(input, |line| -> Result<(), io::Error> {
            lines.push(line.trim_end().to_string());
            Ok(())
        })
        .unwrap();
        assert_eq!(lines, vec!["v 1 2 3", "usemtl caf\u{fffd}", "", "last"]);
    }

    #[test]
    fn test_directive_split() {
        assert_eq!(directive("  v 1 2 3\r"), Some(("v", " 1 2 3")));
        assert_eq!(directive("usemtl\tred"), Some(("usemtl", "\tred")));
        assert_eq!(directive("   "), None);
    }

    #[test]
    fn test_directive_strips_comments() {
        assert_eq!(directive("f 1 2 3 # tri"), Some(("f", " 1 2 3")));
        assert_eq!(directive("# a comment"), None);
        assert_eq!(directive("usemtl red#note"), Some(("usemtl", " red")));
        let (_, args) = directive("f 1//1 2//1 3//1\t# tri\r\n").unwrap();
        assert_eq!(face_corners(args).map(|c| c.len()), Some(3));
    }

    #[test]
    fn test_vector3_ignores_trailing_values() {
        let (_, v) = vector3(" 1.5 -2 3e1 1.0").unwrap();
        assert_eq!(v, (1.5, -2.0, 30.0));
        assert!(vector3(" 1 2").is_err());
        assert!(vector3(" a b c").is_err());
    }

    #[test]
    fn test_face_formats() {
        let full = face_corners(" 1/2/3 4/5/6 7/8/9").unwrap();
        assert_eq!(full[0], FaceVertexRef::new(Some(0), Some(2), Some(1)));

        let no_tex = face_corners(" 1//3 4//6 7//9").unwrap();
        assert_eq!(no_tex[2], FaceVertexRef::new(Some(6), Some(8), None));

        let bare = face_corners(" 1 2 3 ").unwrap();
        assert_eq!(bare[1], FaceVertexRef::new(Some(1), None, None));
    }

    #[test]
    fn test_mixed_and_unsupported_faces() {
        assert!(face_corners(" 1/1/1 2//2 3").is_none());
        assert!(face_corners(" 1/1 2/2 3/3").is_none());
        assert!(face_corners(" a b c").is_none());
        assert!(face_corners("").is_none());
    }

    #[test]
    fn test_map_file_name_skips_options() {
        assert_eq!(map_file_name(" wood.png"), Some("wood.png"));
        assert_eq!(map_file_name(" -s 1 1 1 tex/wood.png"), Some("tex/wood.png"));
        assert_eq!(map_file_name("  "), None);
    }
}
