use geo::dimensions::{Dimensions, HasDimensions};
use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{CoordsIter, EuclideanDistance, EuclideanLength, Intersects};
use geo_types::{Coord, Geometry, Line, LineString, Point, Polygon};

use super::KernelError;

pub(super) fn ensure_finite(geometry: &Geometry<f64>) -> Result<(), KernelError> {
    if geometry
        .coords_iter()
        .all(|c| c.x.is_finite() && c.y.is_finite())
    {
        Ok(())
    } else {
        Err(KernelError::NonFiniteCoordinate)
    }
}

pub(super) fn length(geometry: &Geometry<f64>) -> f64 {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => 0.0,
        Geometry::Line(line) => line.euclidean_length(),
        Geometry::LineString(line_string) => line_string.euclidean_length(),
        Geometry::MultiLineString(lines) => lines.euclidean_length(),
        Geometry::Polygon(polygon) => perimeter(polygon),
        Geometry::MultiPolygon(polygons) => polygons.0.iter().map(perimeter).sum(),
        Geometry::Rect(rect) => perimeter(&rect.to_polygon()),
        Geometry::Triangle(triangle) => perimeter(&triangle.to_polygon()),
        Geometry::GeometryCollection(collection) => collection.0.iter().map(length).sum(),
    }
}

fn perimeter(polygon: &Polygon<f64>) -> f64 {
    polygon.exterior().euclidean_length()
        + polygon
            .interiors()
            .iter()
            .map(|ring| ring.euclidean_length())
            .sum::<f64>()
}

pub(super) fn dimension(geometry: &Geometry<f64>) -> i64 {
    match geometry.dimensions() {
        Dimensions::Empty => -1,
        Dimensions::ZeroDimensional => 0,
        Dimensions::OneDimensional => 1,
        Dimensions::TwoDimensional => 2,
    }
}

pub(super) fn type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) | Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
    }
}

pub(super) fn is_simple(geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::Point(_)
        | Geometry::Line(_)
        | Geometry::Polygon(_)
        | Geometry::MultiPolygon(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_) => true,
        Geometry::MultiPoint(points) => {
            let coords: Vec<Coord<f64>> = points.0.iter().map(|p| p.0).collect();
            coords
                .iter()
                .enumerate()
                .all(|(i, c)| !coords[i + 1..].contains(c))
        }
        Geometry::LineString(line_string) => is_simple_line_string(line_string),
        Geometry::MultiLineString(lines) => {
            lines.0.iter().all(is_simple_line_string) && touch_only_at_ends(&lines.0)
        }
        Geometry::GeometryCollection(collection) => collection.0.iter().all(is_simple),
    }
}

fn is_simple_line_string(line_string: &LineString<f64>) -> bool {
    let lines: Vec<Line<f64>> = line_string.lines().collect();
    let closed = line_string.is_closed();
    let last = lines.len().saturating_sub(1);

    for i in 0..lines.len() {
        for j in (i + 1)..lines.len() {
            let adjacent = j == i + 1 || (closed && i == 0 && j == last);
            match line_intersection(lines[i], lines[j]) {
                None => {}
                Some(LineIntersection::SinglePoint {
                    is_proper: false, ..
                }) if adjacent => {}
                Some(_) => return false,
            }
        }
    }

    true
}

fn touch_only_at_ends(line_strings: &[LineString<f64>]) -> bool {
    let is_end = |line_string: &LineString<f64>, c: &Coord<f64>| {
        line_string.0.first() == Some(c) || line_string.0.last() == Some(c)
    };

    for (i, a) in line_strings.iter().enumerate() {
        for b in &line_strings[i + 1..] {
            for line_a in a.lines() {
                for line_b in b.lines() {
                    match line_intersection(line_a, line_b) {
                        None => {}
                        Some(LineIntersection::SinglePoint { intersection, .. })
                            if is_end(a, &intersection) && is_end(b, &intersection) => {}
                        Some(_) => return false,
                    }
                }
            }
        }
    }

    true
}

/// Points and segments a geometry consists of.
#[derive(Default)]
struct Primitives {
    points: Vec<Point<f64>>,
    lines: Vec<Line<f64>>,
}

impl Primitives {
    fn of(geometry: &Geometry<f64>) -> Self {
        let mut primitives = Self::default();
        primitives.collect(geometry);
        primitives
    }

    fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty()
    }

    fn collect(&mut self, geometry: &Geometry<f64>) {
        match geometry {
            Geometry::Point(point) => self.points.push(*point),
            Geometry::MultiPoint(points) => self.points.extend(points.0.iter().copied()),
            Geometry::Line(line) => self.lines.push(*line),
            Geometry::LineString(line_string) => self.add_line_string(line_string),
            Geometry::MultiLineString(lines) => {
                lines.0.iter().for_each(|l| self.add_line_string(l))
            }
            Geometry::Polygon(polygon) => self.add_polygon(polygon),
            Geometry::MultiPolygon(polygons) => {
                polygons.0.iter().for_each(|p| self.add_polygon(p))
            }
            Geometry::Rect(rect) => self.add_polygon(&rect.to_polygon()),
            Geometry::Triangle(triangle) => self.add_polygon(&triangle.to_polygon()),
            Geometry::GeometryCollection(collection) => {
                collection.0.iter().for_each(|g| self.collect(g))
            }
        }
    }

    fn add_line_string(&mut self, line_string: &LineString<f64>) {
        if line_string.0.len() == 1 {
            self.points.push(Point(line_string.0[0]));
        } else {
            self.lines.extend(line_string.lines());
        }
    }

    fn add_polygon(&mut self, polygon: &Polygon<f64>) {
        self.add_line_string(polygon.exterior());
        polygon
            .interiors()
            .iter()
            .for_each(|ring| self.add_line_string(ring));
    }

    fn distance(&self, other: &Primitives) -> f64 {
        let mut min = f64::INFINITY;

        for a in &self.points {
            for b in &other.points {
                min = min.min(a.euclidean_distance(b));
            }
            for b in &other.lines {
                min = min.min(a.euclidean_distance(b));
            }
        }

        for a in &self.lines {
            for b in &other.points {
                min = min.min(b.euclidean_distance(a));
            }
            for b in &other.lines {
                min = min.min(a.euclidean_distance(b));
            }
        }

        min
    }
}

pub(super) fn distance(a: &Geometry<f64>, b: &Geometry<f64>) -> Result<f64, KernelError> {
    ensure_finite(a)?;
    ensure_finite(b)?;

    let primitives_a = Primitives::of(a);
    let primitives_b = Primitives::of(b);
    if primitives_a.is_empty() || primitives_b.is_empty() || a.intersects(b) {
        return Ok(0.0);
    }

    Ok(primitives_a.distance(&primitives_b))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo_types::{line_string, point, polygon, GeometryCollection, MultiPoint};

    use super::*;

    fn square(offset: f64) -> Polygon<f64> {
        polygon![
            (x: offset, y: 0.0),
            (x: offset + 1.0, y: 0.0),
            (x: offset + 1.0, y: 1.0),
            (x: offset, y: 1.0),
        ]
    }

    #[test]
    fn length_of_polygon_is_perimeter() {
        assert_relative_eq!(length(&square(0.0).into()), 4.0);
        assert_relative_eq!(length(&point!(x: 1.0, y: 1.0).into()), 0.0);
        let line: Geometry<f64> = line_string![(x: 0.0, y: 0.0), (x: 3.0, y: 4.0)].into();
        assert_relative_eq!(length(&line), 5.0);
    }

    #[test]
    fn dimensions() {
        assert_eq!(dimension(&point!(x: 1.0, y: 1.0).into()), 0);
        assert_eq!(
            dimension(&line_string![(x: 0.0, y: 0.0), (x: 3.0, y: 4.0)].into()),
            1
        );
        assert_eq!(dimension(&square(0.0).into()), 2);
        assert_eq!(
            dimension(&Geometry::GeometryCollection(GeometryCollection::default())),
            -1
        );
    }

    #[test]
    fn type_names() {
        assert_eq!(type_name(&square(0.0).into()), "Polygon");
        assert_eq!(
            type_name(&Geometry::GeometryCollection(GeometryCollection::default())),
            "GeometryCollection"
        );
    }

    #[test]
    fn self_intersecting_line_is_not_simple() {
        let bowtie: Geometry<f64> = line_string![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 0.0),
            (x: 0.0, y: 1.0),
        ]
        .into();
        assert!(!is_simple(&bowtie));

        let zigzag: Geometry<f64> = line_string![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 2.0, y: 0.0),
            (x: 3.0, y: 1.0),
        ]
        .into();
        assert!(is_simple(&zigzag));
    }

    #[test]
    fn closed_ring_is_simple() {
        assert!(is_simple(&square(0.0).exterior().clone().into()));
    }

    #[test]
    fn repeated_points_are_not_simple() {
        let points: Geometry<f64> =
            MultiPoint::from(vec![point!(x: 0.0, y: 0.0), point!(x: 0.0, y: 0.0)]).into();
        assert!(!is_simple(&points));
    }

    #[test]
    fn distance_between_squares() {
        let d = distance(&square(0.0).into(), &square(3.0).into()).expect("finite");
        assert_relative_eq!(d, 2.0);
    }

    #[test]
    fn distance_of_intersecting_geometries_is_zero() {
        let d = distance(&square(0.0).into(), &point!(x: 0.5, y: 0.5).into()).expect("finite");
        assert_relative_eq!(d, 0.0);
    }

    #[test]
    fn distance_from_point_to_polygon() {
        let d = distance(&point!(x: 4.0, y: 5.0).into(), &square(0.0).into()).expect("finite");
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn non_finite_coordinates() {
        assert_eq!(
            distance(&point!(x: f64::NAN, y: 0.0).into(), &square(0.0).into()),
            Err(KernelError::NonFiniteCoordinate)
        );
    }
}
