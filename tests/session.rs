//! File sessions against the filesystem.

use lasfile::{
    Builder, Color, Error, File, Header, Mode, Point, Registry, Srs, Transform, Vector, Vlr,
    point::Format,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn points(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| Point {
            x: i as f64,
            y: 2. * i as f64,
            z: -(i as f64),
            intensity: i as u16,
            return_number: 1 + (i % 2) as u8,
            number_of_returns: 2,
            ..Default::default()
        })
        .collect()
}

fn las(dir: &TempDir, registry: &Registry, n: usize) -> PathBuf {
    let path = dir.path().join("points.las");
    let mut file = File::open_write(registry, &path, None).unwrap();
    for point in points(n) {
        file.header_mut().unwrap().add_point(&point);
        file.write(point).unwrap();
    }
    file.close().unwrap();
    path
}

fn collect(file: &mut File) -> Vec<Point> {
    file.points()
        .unwrap()
        .collect::<lasfile::Result<Vec<_>>>()
        .unwrap()
}

#[test]
fn write_then_read() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = las(&dir, &registry, 4);
    let mut file = File::open_read(&registry, &path).unwrap();
    assert_eq!(Mode::Read, file.mode());
    assert_eq!(4, file.len().unwrap());
    assert_eq!([2, 2, 0, 0, 0, 0, 0, 0], file.header().unwrap().number_of_points_by_return());
    assert_eq!(points(4), collect(&mut file));
}

#[test]
fn read_while_writing() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = dir.path().join("points.las");
    let _writer = File::open_write(&registry, &path, None).unwrap();
    assert!(matches!(
        File::open_read(&registry, &path),
        Err(Error::AlreadyOpenForWrite(_))
    ));
    assert!(matches!(
        File::open_append(&registry, &path, None),
        Err(Error::AlreadyOpenForWrite(_))
    ));
}

#[test]
fn write_while_reading() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = las(&dir, &registry, 1);
    let _reader = File::open_read(&registry, &path).unwrap();
    assert!(matches!(
        File::open_write(&registry, &path, None),
        Err(Error::AlreadyOpenForRead(_))
    ));
    // The refused writer must not have truncated the file.
    let mut second = File::open_read(&registry, &path).unwrap();
    assert_eq!(1, collect(&mut second).len());
}

#[test]
fn invalid_header_leaves_existing_file_alone() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = las(&dir, &registry, 1);
    let before = std::fs::read(&path).unwrap();

    let mut header = Header::default();
    header.transforms.x.scale = 0.;
    assert!(matches!(
        File::open_write(&registry, &path, Some(header)),
        Err(Error::ConfigurationError(_))
    ));
    assert!(registry.is_empty());
    assert_eq!(before, std::fs::read(&path).unwrap());
}

#[test]
fn two_readers() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = las(&dir, &registry, 2);
    let mut a = File::open_read(&registry, &path).unwrap();
    let mut b = File::open_read(&registry, &path).unwrap();
    assert_eq!(2, registry.readers(&path));
    assert_eq!(collect(&mut a), collect(&mut b));
    a.close().unwrap();
    assert_eq!(1, registry.readers(&path));
    drop(b);
    assert!(registry.is_empty());
}

#[test]
fn separate_registries_do_not_conflict() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = las(&dir, &registry, 1);
    let _reader = File::open_read(&registry, &path).unwrap();
    let other = Registry::new();
    let _reader = File::open_read(&other, &path).unwrap();
}

#[test]
fn exhaustion_restart() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = las(&dir, &registry, 5);
    let mut file = File::open_read(&registry, &path).unwrap();
    let first = collect(&mut file);
    let second = collect(&mut file);
    assert_eq!(5, first.len());
    assert_eq!(first, second);
    assert!(file.is_open());
    assert_eq!(1, registry.readers(&path));
}

#[test]
fn format_1_scenario() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = dir.path().join("scenario.las");

    let mut builder = Builder::default();
    builder.point_format = Format::new(1).unwrap();
    builder.transforms = Vector::splat(Transform {
        scale: 0.01,
        offset: 0.,
    });
    let header = builder.into_header().unwrap();

    let mut file = File::open_write(&registry, &path, Some(header)).unwrap();
    let point = Point {
        x: 42.,
        y: -93.,
        z: 16.,
        intensity: 500,
        classification: 2,
        gps_time: Some(0.),
        ..Default::default()
    };
    file.header_mut().unwrap().add_point(&point);
    file.write(point).unwrap();
    file.close().unwrap();

    let mut file = File::open_read(&registry, &path).unwrap();
    assert_eq!(1, file.header().unwrap().point_format.to_u8());
    assert_eq!(28, file.header().unwrap().point_format.len());
    let point = file.read(0).unwrap();
    assert!((point.x - 42.).abs() < 1e-9);
    assert!((point.y + 93.).abs() < 1e-9);
    assert!((point.z - 16.).abs() < 1e-9);
    assert_eq!(500, point.intensity);
    assert_eq!(2, point.classification);
    assert_eq!(Some(0.), point.gps_time);
    assert_eq!(None, point.color);
}

#[test]
fn color_needs_a_color_format() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let mut file = File::open_write(&registry, dir.path().join("a.las"), None).unwrap();
    let mut point = Point::default();
    point.set_color((1, 2, 3));
    assert!(matches!(
        file.write(point),
        Err(Error::UnsupportedField { format: 0, .. })
    ));
    let mut point = Point::default();
    point.set_color(Color::new(1, 2, 3));
    assert!(point.color.is_some());
}

#[test]
fn vlr_length_must_match_data() {
    let mut vlr = Vlr::from_data("lasfile", 1, "", vec![0; 6]).unwrap();
    vlr.record_length = 10;
    assert!(matches!(
        vlr.write_to(Vec::new()),
        Err(Error::InconsistentLength {
            declared: 10,
            actual: 6,
            ..
        })
    ));
}

#[test]
fn return_histogram() {
    let mut header = Header::default();
    header
        .set_number_of_points_by_return(&[5, 0, 0, 0, 0, 0, 0, 0])
        .unwrap();
    assert_eq!([5, 0, 0, 0, 0, 0, 0, 0], header.number_of_points_by_return());
}

#[test]
fn append() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = las(&dir, &registry, 2);

    let mut file = File::open_append(&registry, &path, None).unwrap();
    assert_eq!(Mode::Append, file.mode());
    assert!(registry.is_open_for_write(&path));
    file.write(Point {
        x: 10.,
        ..Default::default()
    })
    .unwrap();
    let summary = file.summarize().unwrap();
    assert_eq!(3, summary.number_of_points);
    assert_eq!(10., summary.bounds.max.x);
    file.close().unwrap();

    let mut file = File::open_read(&registry, &path).unwrap();
    assert_eq!(3, file.len().unwrap());
    let xs: Vec<f64> = collect(&mut file).iter().map(|p| p.x).collect();
    assert_eq!(vec![0., 1., 10.], xs);
}

#[test]
fn append_to_missing_file() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    assert!(File::open_append(&registry, dir.path().join("missing.las"), None).is_err());
    assert!(registry.is_empty());
}

#[test]
fn index_out_of_range() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = dir.path().join("liar.las");
    let mut file = File::open_write(&registry, &path, None).unwrap();
    file.write(Point::default()).unwrap();
    file.header_mut().unwrap().number_of_points = 10;
    file.close().unwrap();

    let mut file = File::open_read(&registry, &path).unwrap();
    assert_eq!(10, file.len().unwrap());
    assert!(file.read(0).is_ok());
    assert!(matches!(
        file.read(1),
        Err(Error::IndexOutOfRange {
            index: 1,
            available: 1
        })
    ));
    assert_eq!(1, collect(&mut file).len());
}

#[test]
fn random_access_leaves_iteration_alone() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = las(&dir, &registry, 3);
    let mut file = File::open_read(&registry, &path).unwrap();
    let mut points = file.points().unwrap();
    assert_eq!(0., points.next().unwrap().unwrap().x);
    drop(points);
    assert_eq!(2., file.read(2).unwrap().x);
    assert_eq!(1., file.points().unwrap().next().unwrap().unwrap().x);
}

#[test]
fn wrong_mode_and_closed() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = las(&dir, &registry, 1);
    let mut file = File::open_read(&registry, &path).unwrap();
    assert!(matches!(
        file.write(Point::default()),
        Err(Error::WrongMode { mode: Mode::Read, .. })
    ));
    file.close().unwrap();
    file.close().unwrap();
    assert!(matches!(file.read(0), Err(Error::Closed)));
    assert!(matches!(file.points(), Err(Error::Closed)));
}

#[test]
fn srs_is_forwarded() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = dir.path().join("srs.las");
    let mut header = Header::default();
    header.set_srs(Srs::from_wkt("GEOGCS[\"WGS 84\"]").unwrap());
    File::open_write(&registry, &path, Some(header))
        .unwrap()
        .close()
        .unwrap();

    let file = File::open_read(&registry, &path).unwrap();
    let srs = file.srs().unwrap().unwrap();
    assert_eq!(Some("GEOGCS[\"WGS 84\"]"), srs.wkt());
}

#[test]
fn relative_paths_share_claims() {
    let dir = TempDir::new_in(".").unwrap();
    let registry = Registry::new();
    let name = dir.path().file_name().unwrap();
    let relative = Path::new(name).join("points.las");
    let _writer = File::open_write(&registry, &relative, None).unwrap();
    let absolute = std::env::current_dir().unwrap().join(name).join("points.las");
    assert!(registry.is_open_for_write(&absolute));
}

#[test]
fn threads() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::new();
    let path = las(&dir, &registry, 3);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            let path = path.clone();
            std::thread::spawn(move || {
                let mut file = File::open_read(&registry, &path).unwrap();
                collect(&mut file).len()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(3, handle.join().unwrap());
    }
    assert!(registry.is_empty());
}
