//! SVG path-data parsing.
//!
//! Supports M/L/H/V/C/S/Q/T/A/Z in absolute and relative form, implicit
//! command repetition and compact arc flags. Parsing drives a
//! [`PathBuilder`]; malformed input yields an error and no partial shape.
use std::iter::Peekable;
use std::str::CharIndices;

use super::PathBuilder;
use crate::error::SvgParseError;
use crate::geometry::Shape;
use crate::math::{Point2, Vector2};

type ParseResult<T> = std::result::Result<T, SvgParseError>;

/// Parses SVG path data (the `d` attribute) into a shape.
///
/// # Errors
///
/// Returns an [`SvgParseError`] describing the first malformed token.
pub fn parse_svg_path(data: &str) -> ParseResult<Shape> {
    let mut parser = Parser::new(data);
    parser.run()?;
    Ok(parser.builder.build())
}

struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
    builder: PathBuilder,
    current: Point2,
    start: Point2,
    /// Last cubic second handle, for `S`.
    last_cubic: Option<Point2>,
    /// Last quadratic control point, for `T`.
    last_quad: Option<Point2>,
}

impl<'a> Parser<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            chars: data.char_indices().peekable(),
            len: data.len(),
            builder: PathBuilder::new(),
            current: Point2::origin(),
            start: Point2::origin(),
            last_cubic: None,
            last_quad: None,
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.len, |&(i, _)| i)
    }

    fn skip_separators(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() || c == ',' {
                self.chars.next();
            } else {
                break;
            }
        }
    }

    /// Returns `true` if another number follows (for implicit repeats).
    fn number_follows(&mut self) -> bool {
        self.skip_separators();
        matches!(self.chars.peek(), Some(&(_, c)) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
    }

    fn run(&mut self) -> ParseResult<()> {
        self.skip_separators();
        let Some(&(offset, first)) = self.chars.peek() else {
            return Err(SvgParseError::Empty);
        };
        if !matches!(first, 'M' | 'm') {
            return if first.is_ascii_alphabetic() || first.is_ascii_digit() || first == '-' {
                Err(SvgParseError::MissingMoveTo)
            } else {
                Err(SvgParseError::UnexpectedChar { ch: first, offset })
            };
        }

        loop {
            self.skip_separators();
            let Some((offset, command)) = self.chars.next() else {
                return Ok(());
            };
            if !matches!(command.to_ascii_uppercase(), 'M' | 'L' | 'H' | 'V' | 'C' | 'S' | 'Q' | 'T' | 'A' | 'Z')
            {
                return Err(SvgParseError::UnexpectedChar { ch: command, offset });
            }
            self.command(command)?;
            if command.to_ascii_uppercase() == 'Z' {
                continue;
            }
            // Extra coordinate groups repeat the command; after a moveto they
            // are linetos.
            while self.number_follows() {
                let repeat = match command {
                    'M' => 'L',
                    'm' => 'l',
                    c => c,
                };
                self.command(repeat)?;
            }
        }
    }

    fn command(&mut self, command: char) -> ParseResult<()> {
        let relative = command.is_ascii_lowercase();
        let base = if relative { self.current.coords } else { Vector2::zeros() };
        let upper = command.to_ascii_uppercase();

        match upper {
            'M' => {
                let p = self.point()? + base;
                self.builder.move_to(p);
                self.current = p;
                self.start = p;
            }
            'L' => {
                let p = self.point()? + base;
                self.line_to(p);
            }
            'H' => {
                let x = self.number()?;
                let x = if relative { self.current.x + x } else { x };
                self.line_to(Point2::new(x, self.current.y));
            }
            'V' => {
                let y = self.number()?;
                let y = if relative { self.current.y + y } else { y };
                self.line_to(Point2::new(self.current.x, y));
            }
            'C' => {
                let c1 = self.point()? + base;
                let c2 = self.point()? + base;
                let end = self.point()? + base;
                self.cubic_to(c1, c2, end);
            }
            'S' => {
                let c1 = reflect(self.last_cubic, &self.current);
                let c2 = self.point()? + base;
                let end = self.point()? + base;
                self.cubic_to(c1, c2, end);
            }
            'Q' => {
                let control = self.point()? + base;
                let end = self.point()? + base;
                self.quad_to(control, end);
            }
            'T' => {
                let control = reflect(self.last_quad, &self.current);
                let end = self.point()? + base;
                self.quad_to(control, end);
            }
            'A' => {
                let rx = self.number()?;
                let ry = self.number()?;
                let rotation = self.number()?;
                let large_arc = self.flag()?;
                let sweep = self.flag()?;
                let end = self.point()? + base;
                self.builder
                    .arc_to(Vector2::new(rx, ry), rotation, large_arc, sweep, end);
                self.current = end;
            }
            _ => {
                // Z: the next subpath starts where this one started.
                self.builder.close_figure();
                self.builder.move_to(self.start);
                self.current = self.start;
            }
        }

        if !matches!(upper, 'C' | 'S') {
            self.last_cubic = None;
        }
        if !matches!(upper, 'Q' | 'T') {
            self.last_quad = None;
        }
        Ok(())
    }

    fn line_to(&mut self, p: Point2) {
        self.builder.line_to(p);
        self.current = p;
    }

    fn cubic_to(&mut self, c1: Point2, c2: Point2, end: Point2) {
        self.builder.cubic_bezier_to(c1, c2, end);
        self.current = end;
        self.last_cubic = Some(c2);
    }

    fn quad_to(&mut self, control: Point2, end: Point2) {
        self.builder.quadratic_bezier_to(control, end);
        self.current = end;
        self.last_quad = Some(control);
    }

    fn point(&mut self) -> ParseResult<Point2> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point2::new(x, y))
    }

    fn number(&mut self) -> ParseResult<f64> {
        self.skip_separators();
        let offset = self.offset();
        let mut s = String::new();

        if let Some(&(_, c)) = self.chars.peek() {
            if c == '-' || c == '+' {
                s.push(c);
                self.chars.next();
            }
        }

        let mut has_dot = false;
        let mut has_exp = false;
        let mut has_digits = false;
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                has_digits = true;
            } else if c == '.' && !has_dot && !has_exp {
                has_dot = true;
            } else if (c == 'e' || c == 'E') && has_digits && !has_exp {
                has_exp = true;
                s.push(c);
                self.chars.next();
                if let Some(&(_, sign)) = self.chars.peek() {
                    if sign == '-' || sign == '+' {
                        s.push(sign);
                        self.chars.next();
                    }
                }
                continue;
            } else {
                break;
            }
            s.push(c);
            self.chars.next();
        }

        if !has_digits {
            return Err(SvgParseError::ExpectedNumber { offset });
        }
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(SvgParseError::ExpectedNumber { offset })
    }

    fn flag(&mut self) -> ParseResult<bool> {
        self.skip_separators();
        let offset = self.offset();
        match self.chars.next() {
            Some((_, '0')) => Ok(false),
            Some((_, '1')) => Ok(true),
            _ => Err(SvgParseError::ExpectedFlag { offset }),
        }
    }
}

/// Mirrors the previous handle through `current`, or `current` itself.
fn reflect(handle: Option<Point2>, current: &Point2) -> Point2 {
    handle.map_or(*current, |h| current + (current - h))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::PathType;

    fn points(data: &str) -> Vec<Point2> {
        parse_svg_path(data).unwrap().flatten()[0].points.clone()
    }

    #[test]
    fn parses_closed_triangle() {
        let shape = parse_svg_path("M0,0 L10,0 L10,10 Z").unwrap();
        assert_eq!(shape.path_type(), PathType::Closed);
        assert_eq!(shape.paths().len(), 1);
    }

    #[test]
    fn relative_and_axis_commands() {
        let pts = points("m 1 1 h 4 v 4 h -4");
        assert_eq!(
            pts,
            vec![
                Point2::new(1.0, 1.0),
                Point2::new(5.0, 1.0),
                Point2::new(5.0, 5.0),
                Point2::new(1.0, 5.0)
            ]
        );
    }

    #[test]
    fn implicit_lineto_after_moveto() {
        let pts = points("M0 0 10 0 10 10");
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[2], Point2::new(10.0, 10.0));
    }

    #[test]
    fn numbers_without_separators() {
        let pts = points("M0-5L10-5.5.5");
        assert_eq!(pts[0], Point2::new(0.0, -5.0));
        assert_eq!(pts[1], Point2::new(10.0, -5.5));
        assert_eq!(pts[2], Point2::new(10.0, 0.5));
    }

    #[test]
    fn scientific_notation() {
        let pts = points("M1e1,0 L2E1,0");
        assert_eq!(pts[0], Point2::new(10.0, 0.0));
        assert_eq!(pts[1], Point2::new(20.0, 0.0));
    }

    #[test]
    fn curves_end_at_their_targets() {
        let shape = parse_svg_path("M0,0 C0,10 10,10 10,0 S20,-10 20,0 Q25,10 30,0 T40,0").unwrap();
        let pts = &shape.flatten()[0].points;
        assert_eq!(pts[0], Point2::new(0.0, 0.0));
        let last = pts[pts.len() - 1];
        assert!((last - Point2::new(40.0, 0.0)).norm() < 1e-9);
        assert!(pts.len() > 8);
    }

    #[test]
    fn compact_arc_flags() {
        let shape = parse_svg_path("M0,0 a5,5 0 0110,0").unwrap();
        let pts = &shape.flatten()[0].points;
        let last = pts[pts.len() - 1];
        assert!((last - Point2::new(10.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn subpath_after_close_starts_at_previous_start() {
        let shape = parse_svg_path("M5,5 L10,5 L10,10 Z l0,10 l5,0").unwrap();
        let flat = shape.flatten();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[1].points[0], Point2::new(5.0, 5.0));
        assert_eq!(flat[1].points[1], Point2::new(5.0, 15.0));
    }

    #[test]
    fn malformed_input_is_reported() {
        assert_eq!(parse_svg_path("   ").unwrap_err(), SvgParseError::Empty);
        assert_eq!(parse_svg_path("L0,0").unwrap_err(), SvgParseError::MissingMoveTo);
        assert_eq!(
            parse_svg_path("M0,0 X1,1").unwrap_err(),
            SvgParseError::UnexpectedChar { ch: 'X', offset: 5 }
        );
        assert_eq!(
            parse_svg_path("M0,0 L1").unwrap_err(),
            SvgParseError::ExpectedNumber { offset: 7 }
        );
        assert_eq!(
            parse_svg_path("M0,0 A5,5 0 2 0 10,0").unwrap_err(),
            SvgParseError::ExpectedFlag { offset: 12 }
        );
    }
}
