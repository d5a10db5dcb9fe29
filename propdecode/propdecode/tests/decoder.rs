#![allow(non_snake_case)]

use chrono::{DateTime, FixedOffset, Utc};
use propdecode::{
    ConversionError, DecodeError, DecodeOptions, Decoder, Record, SourceRecord, Value, decode,
};

const CREATED: &str = "20240315123045.000000+000";

fn system_process() -> SourceRecord {
    SourceRecord::new()
        .with("Name", "System")
        .with("ProcessId", 4_u32)
        .with("Description", "System")
        .with("CreationDate", Value::datetime(CREATED))
        .with("TerminationDate", Value::Null)
        .with("KernelModeTime", 0_u64)
        .with("HandleCount", 2048_u32)
}

fn allow_missing() -> Decoder {
    Decoder::builder().allow_missing_fields(true).build()
}

#[derive(Debug, Default, PartialEq, Record)]
struct Process {
    Name: String,
    ProcessId: u32,
    Description: Option<String>,
    CreationDate: Option<DateTime<Utc>>,
    TerminationDate: Option<DateTime<Utc>>,
    KernelModeTime: u64,
    HandleCount: u32,
}

#[test]
fn decodes_fields_by_declared_name() {
    let processes: Vec<Process> = Decoder::new().decode(vec![system_process()]).unwrap();

    assert_eq!(processes.len(), 1);
    let system = &processes[0];
    assert_eq!(system.Name, "System");
    assert_eq!(system.ProcessId, 4);
    assert_eq!(system.Description.as_deref(), Some("System"));
    assert_eq!(
        system.CreationDate.map(|dt| dt.timestamp()),
        Some(1_710_505_845)
    );
    assert_eq!(system.TerminationDate, None);
    assert_eq!(system.KernelModeTime, 0);
    assert_eq!(system.HandleCount, 2048);
}

// A bit modified version of Process.
#[derive(Debug, Default, PartialEq, Record)]
struct MiniProcess {
    Name: String,
    ProcessId: isize,
    CreationDate: DateTime<FixedOffset>,
    KernelModeTime: usize,
}

#[test]
fn decodes_into_narrower_and_signed_fields() {
    let processes: Vec<MiniProcess> = Decoder::new().decode(vec![system_process()]).unwrap();

    let system = &processes[0];
    assert_eq!(system.ProcessId, 4);
    assert_eq!(system.KernelModeTime, 0);
    assert_eq!(system.CreationDate.timestamp(), 1_710_505_845);
}

#[test]
fn out_of_range_value_is_conversion_error() {
    #[derive(Debug, Default, Record)]
    struct Handles {
        #[prop(rename = "HandleCount")]
        count: u32,
    }

    let row = SourceRecord::new().with("HandleCount", u64::MAX);
    let err = Decoder::new().decode::<Handles, _>(vec![row]).unwrap_err();
    match err {
        DecodeError::Conversion {
            record,
            property,
            field,
            source,
        } => {
            assert_eq!(record, 0);
            assert_eq!(property, "HandleCount");
            assert_eq!(field, "count");
            assert!(matches!(source, ConversionError::OutOfRange { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn kind_mismatch_is_conversion_error() {
    let row = SourceRecord::new()
        .with("Name", 42_u32)
        .with("ProcessId", 4_u32)
        .with("CreationDate", Value::datetime(CREATED))
        .with("KernelModeTime", 0_u64);

    let err = Decoder::new().decode::<MiniProcess, _>(vec![row]).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Conversion {
            field: "Name",
            source: ConversionError::Mismatch { source_kind: "u32", .. },
            ..
        }
    ));
}

#[test]
fn malformed_timestamp_is_conversion_error() {
    let row = SourceRecord::new()
        .with("Name", "System")
        .with("ProcessId", 4_u32)
        .with("CreationDate", Value::datetime("yesterday"))
        .with("KernelModeTime", 0_u64);

    let err = Decoder::new().decode::<MiniProcess, _>(vec![row]).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Conversion {
            field: "CreationDate",
            source: ConversionError::Timestamp { .. },
            ..
        }
    ));
}

#[test]
fn missing_field_fails_by_default() {
    let row = SourceRecord::new().with("Name", "System").with("ProcessId", 4_u32);

    let err = Decoder::new().decode::<MiniProcess, _>(vec![row]).unwrap_err();
    match &err {
        DecodeError::MissingField {
            record,
            property,
            field,
        } => {
            assert_eq!(*record, 0);
            assert_eq!(property, "CreationDate");
            assert_eq!(*field, "CreationDate");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.record(), Some(0));
    assert_eq!(
        err.to_string(),
        "record 0: property 'CreationDate' for field 'CreationDate' is missing"
    );
}

#[test]
fn allow_missing_fields_leaves_defaults() {
    let row = SourceRecord::new().with("Name", "System").with("ProcessId", 4_u32);

    let processes: Vec<MiniProcess> = allow_missing().decode(vec![row]).unwrap();
    let system = &processes[0];
    assert_ne!(system, &MiniProcess::default());
    assert_eq!(system.Name, "System");
    assert_eq!(system.ProcessId, 4);
    assert_eq!(system.KernelModeTime, 0);
    assert_eq!(system.CreationDate, DateTime::<FixedOffset>::default());
}

#[test]
fn allow_missing_fields_ignores_extra_source_properties() {
    let processes: Vec<MiniProcess> = decode(
        vec![system_process().with("ThreadCount", 200_u32)],
        DecodeOptions {
            allow_missing_fields: true,
        },
    )
    .unwrap();
    assert_eq!(processes[0].Name, "System");
}

#[test]
fn null_into_required_field_depends_on_options() {
    let row = SourceRecord::new()
        .with("Name", Value::Null)
        .with("ProcessId", 4_u32)
        .with("CreationDate", Value::datetime(CREATED))
        .with("KernelModeTime", 0_u64);

    let err = Decoder::new()
        .decode::<MiniProcess, _>(vec![row.clone()])
        .unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Conversion {
            field: "Name",
            source: ConversionError::Mismatch {
                source_kind: "null",
                ..
            },
            ..
        }
    ));

    let processes: Vec<MiniProcess> = allow_missing().decode(vec![row]).unwrap();
    assert_eq!(processes[0].Name, "");
    assert_eq!(processes[0].ProcessId, 4);
}

#[derive(Debug, Default, PartialEq, Record)]
struct Optionals {
    Description: Option<String>,
    ProcessId: Option<u32>,
}

#[derive(Debug, PartialEq, Record)]
struct PresetOptionals {
    Description: Option<String>,
}

impl Default for PresetOptionals {
    fn default() -> Self {
        Self {
            Description: Some("preset".to_string()),
        }
    }
}

#[test]
fn optional_fields_present_absent_and_null() {
    let rows = vec![
        SourceRecord::new()
            .with("Description", "System")
            .with("ProcessId", 4_u32),
        SourceRecord::new().with("Description", Value::Null),
        SourceRecord::new(),
    ];

    for decoder in [Decoder::new(), allow_missing()] {
        let decoded: Vec<Optionals> = decoder.decode(rows.clone()).unwrap();
        assert_eq!(
            decoded,
            vec![
                Optionals {
                    Description: Some("System".to_string()),
                    ProcessId: Some(4),
                },
                Optionals::default(),
                Optionals::default(),
            ]
        );
    }
}

#[test]
fn absent_optional_field_decodes_to_absent_not_default() {
    let decoded: Vec<PresetOptionals> = allow_missing().decode(vec![SourceRecord::new()]).unwrap();
    assert_eq!(decoded[0].Description, None);
}

#[test]
fn lookup_ignores_property_name_case() {
    #[derive(Debug, Default, Record)]
    struct Lower {
        name: String,
        processid: u32,
    }

    let decoded: Vec<Lower> = Decoder::new().decode(vec![system_process()]).unwrap();
    assert_eq!(decoded[0].name, "System");
    assert_eq!(decoded[0].processid, 4);
}

#[test]
fn empty_input_yields_empty_output() {
    let decoded: Vec<Process> = Decoder::new().decode(Vec::<SourceRecord>::new()).unwrap();
    assert!(decoded.is_empty());
}

#[test]
fn output_preserves_input_order() {
    let rows: Vec<SourceRecord> = (0..50_u32)
        .map(|pid| SourceRecord::new().with("ProcessId", pid))
        .collect();

    #[derive(Debug, Default, Record)]
    struct Pid {
        ProcessId: u32,
    }

    let decoded: Vec<Pid> = Decoder::new().decode(&rows).unwrap();
    let pids: Vec<u32> = decoded.iter().map(|p| p.ProcessId).collect();
    assert_eq!(pids, (0..50).collect::<Vec<_>>());
}

#[test]
fn first_error_aborts_and_reports_position() {
    let rows = vec![
        SourceRecord::new().with("ProcessId", 1_u32),
        SourceRecord::new().with("ProcessId", 2_u32),
        SourceRecord::new().with("ProcessId", "three"),
        SourceRecord::new(),
    ];

    #[derive(Debug, Default, Record)]
    struct Pid {
        ProcessId: u32,
    }

    let err = Decoder::new().decode::<Pid, _>(rows).unwrap_err();
    assert_eq!(err.record(), Some(2));
}

#[test]
fn decode_one_decodes_single_object() {
    let system: MiniProcess = Decoder::new().decode_one(system_process()).unwrap();
    assert_eq!(system.Name, "System");

    let err = Decoder::new()
        .decode_one::<MiniProcess>(SourceRecord::new())
        .unwrap_err();
    assert_eq!(err.record(), Some(0));
}

#[test]
fn arrays_and_floats_decode() {
    #[derive(Debug, Default, Record)]
    struct Adapter {
        IPAddress: Option<Vec<String>>,
        DefaultIPGateway: Option<Vec<String>>,
        MTU: u32,
        LoadPercentage: f64,
    }

    let row = SourceRecord::new()
        .with("IPAddress", vec!["192.168.1.10", "fe80::1"])
        .with("DefaultIPGateway", Value::Null)
        .with("MTU", 1500_u32)
        .with("LoadPercentage", 12.5_f32);

    let adapters: Vec<Adapter> = Decoder::new().decode(vec![row]).unwrap();
    let adapter = &adapters[0];
    assert_eq!(
        adapter.IPAddress.as_deref(),
        Some(&["192.168.1.10".to_string(), "fe80::1".to_string()][..])
    );
    assert_eq!(adapter.DefaultIPGateway, None);
    assert_eq!(adapter.MTU, 1500);
    assert_eq!(adapter.LoadPercentage, 12.5);
}

#[test]
fn decoder_options_accessors() {
    let mut decoder = Decoder::new();
    assert!(!decoder.options().allow_missing_fields);
    decoder.options_mut().allow_missing_fields = true;
    assert_eq!(
        *decoder.options(),
        DecodeOptions {
            allow_missing_fields: true
        }
    );
    assert_eq!(DecodeOptions::default(), *Decoder::default().options());
}
