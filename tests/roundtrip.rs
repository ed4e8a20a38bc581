//! Roundtrip (write-read) tests for supported LAS versions and attributes.

use lasfile::{Builder, Point, Reader, Writer};
use std::io::Cursor;

pub fn roundtrip(builder: Builder, point: &Point, should_succeed: bool) {
    let header = if should_succeed {
        builder.into_header().unwrap()
    } else {
        assert!(builder.into_header().is_err());
        return;
    };
    let mut writer = Writer::new(Cursor::new(Vec::new()), header).unwrap();
    writer.write_point(point.clone()).unwrap();
    let header = writer.header().clone();
    let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
    assert_eq!(*point, reader.read_point().unwrap().unwrap());
    assert!(reader.read_point().unwrap().is_none());
    assert_eq!(header, *reader.header());
}

macro_rules! roundtrip_point {
    ($name:ident, $modify_point:expr) => {
        roundtrip_point!($name, $modify_point, |_f| {});
    };
    ($name:ident, $modify_point:expr, $modify_point_format:expr) => {
        #[test]
        fn $name() {
            use lasfile::{Builder, Point, point::Format};

            let mut point_format = Format::default();
            $modify_point_format(&mut point_format);
            let mut point = Point::default();
            $modify_point(&mut point);
            let mut builder = Builder::default();
            builder.version = super::version();
            builder.point_format = point_format;
            crate::roundtrip(builder, &point, true);
        }
    };
}

macro_rules! roundtrip_builder {
    ($name:ident, $modify_builder:expr) => {
        roundtrip_builder!($name, $modify_builder, 0);
    };
    ($name:ident, $modify_builder:expr, $min_version_minor:expr) => {
        #[test]
        fn $name() {
            use lasfile::{Builder, Point, Version};

            let version = super::version();
            let should_succeed = version >= Version::new(1, $min_version_minor);
            let mut builder = Builder::default();
            builder.version = version;
            $modify_builder(&mut builder);
            crate::roundtrip(builder, &Point::default(), should_succeed);
        }
    };
}

macro_rules! version {
    ($name:ident, $major:expr, $minor:expr) => {
        mod $name {
            use lasfile::Version;

            fn version() -> Version {
                Version::new($major, $minor)
            }

            mod point {
                use lasfile::{Color, point::ScanDirection};

                roundtrip_point!(xyz, |p: &mut Point| {
                    p.x = 1.;
                    p.y = 2.;
                    p.z = 3.;
                });
                roundtrip_point!(negative_xyz, |p: &mut Point| {
                    p.x = -1.5;
                    p.y = -200.25;
                    p.z = -0.01;
                });
                roundtrip_point!(intensity, |p: &mut Point| p.intensity = 42);
                roundtrip_point!(return_number, |p: &mut Point| p.return_number = 2);
                roundtrip_point!(number_of_returns, |p: &mut Point| p.number_of_returns = 7);
                roundtrip_point!(scan_direction, |p: &mut Point| p.scan_direction =
                    ScanDirection::LeftToRight);
                roundtrip_point!(is_edge_of_flight_line, |p: &mut Point| p
                    .is_edge_of_flight_line =
                    true);
                roundtrip_point!(classification, |p: &mut Point| p.set_class_code(2));
                roundtrip_point!(is_withheld, |p: &mut Point| p.classification = 0x80 | 6);
                roundtrip_point!(scan_angle_rank, |p: &mut Point| p.scan_angle_rank = -90);
                roundtrip_point!(user_data, |p: &mut Point| p.user_data = 42);
                roundtrip_point!(point_source_id, |p: &mut Point| p.point_source_id = 42);
                roundtrip_point!(
                    gps_time,
                    |p: &mut Point| p.gps_time = Some(42.),
                    |f: &mut Format| f.has_gps_time = true
                );
                roundtrip_point!(
                    color,
                    |p: &mut Point| p.color = Some(Color::new(1, 2, 3)),
                    |f: &mut Format| f.has_color = true
                );
                roundtrip_point!(
                    gps_time_and_color,
                    |p: &mut Point| {
                        p.gps_time = Some(-1.25);
                        p.color = Some(Color::new(u16::MAX, 0, 256));
                    },
                    |f: &mut Format| *f = Format::new(3).unwrap()
                );
                roundtrip_point!(
                    extra_bytes,
                    |p: &mut Point| p.extra_bytes = vec![42, 43],
                    |f: &mut Format| f.extra_bytes = 2
                );
            }

            mod builder {
                use chrono::NaiveDate;
                use lasfile::{GpsTimeType, Guid, Srs, Transform, Vector, Vlr};

                roundtrip_builder!(file_source_id, |b: &mut Builder| b.file_source_id = 42, 1);
                roundtrip_builder!(
                    gps_time_type,
                    |b: &mut Builder| b.gps_time_type = GpsTimeType::Standard,
                    2
                );
                roundtrip_builder!(guid, |b: &mut Builder| b.guid = Guid::from_bytes([42; 16]));
                roundtrip_builder!(system_identifier, |b: &mut Builder| b.system_identifier =
                    "roundtrip test".to_string());
                roundtrip_builder!(generating_software, |b: &mut Builder| b
                    .generating_software =
                    "roundtrip test".to_string());
                roundtrip_builder!(date, |b: &mut Builder| b.date =
                    NaiveDate::from_ymd_opt(2017, 10, 30));
                roundtrip_builder!(no_date, |b: &mut Builder| b.date = None);
                roundtrip_builder!(transforms, |b: &mut Builder| {
                    b.transforms = Vector::splat(Transform {
                        scale: 0.1,
                        offset: -1.,
                    });
                });
                roundtrip_builder!(vlrs, |b: &mut Builder| b.vlrs.push(Default::default()));
                roundtrip_builder!(srs, |b: &mut Builder| b
                    .vlrs
                    .extend(Srs::from_wkt("LOCAL_CS[\"roundtrip\"]").unwrap().into_vlrs()));
                roundtrip_builder!(vlr_with_data, |b: &mut Builder| b.vlrs.push(
                    Vlr::from_data("lasfile", 42, "some bytes", vec![1, 2, 3, 4]).unwrap()
                ));
                roundtrip_builder!(padding, |b: &mut Builder| b.padding =
                    b"You probably shouldn't do this".to_vec());
                roundtrip_builder!(vlr_padding, |b: &mut Builder| b.vlr_padding =
                    b"You probably shouldn't do this either".to_vec());
            }
        }
    };
}

version!(las_1_0, 1, 0);
version!(las_1_1, 1, 1);
version!(las_1_2, 1, 2);
version!(las_1_3, 1, 3);
version!(las_1_4, 1, 4);
