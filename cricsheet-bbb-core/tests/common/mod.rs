#![allow(dead_code)]

use serde_json::{json, Value};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// A small but realistic Cricsheet match: two innings, a caught dismissal,
/// a leg-bye and a wide.
pub fn match_json(teams: &[&str], dates: &[&str], match_type: Option<&str>) -> Value {
    let mut info = json!({
        "teams": teams,
        "dates": dates,
        "venue": "Headingley, Leeds",
        "city": "Leeds",
        "season": "2025",
        "event": { "name": "India tour of England", "match_number": 1 }
    });
    if let Some(kind) = match_type {
        info["match_type"] = json!(kind);
    }
    json!({
        "meta": { "data_version": "1.1.0" },
        "info": info,
        "innings": [
            {
                "team": teams.first().copied().unwrap_or("India"),
                "overs": [
                    { "over": 0, "deliveries": [
                        { "batter": "YBK Jaiswal", "bowler": "CR Woakes", "non_striker": "KL Rahul",
                          "runs": { "batter": 4, "extras": 0, "total": 4 } },
                        { "batter": "YBK Jaiswal", "bowler": "CR Woakes", "non_striker": "KL Rahul",
                          "runs": { "batter": 0, "extras": 1, "total": 1 }, "extras": { "legbyes": 1 } }
                    ]},
                    { "over": 1, "deliveries": [
                        { "batter": "KL Rahul", "bowler": "BA Carse", "non_striker": "YBK Jaiswal",
                          "runs": { "batter": 0, "extras": 0, "total": 0 },
                          "wickets": [ { "kind": "caught", "player_out": "KL Rahul",
                                         "fielders": [ { "name": "JE Root" } ] } ] }
                    ]}
                ]
            },
            {
                "team": teams.get(1).copied().unwrap_or("England"),
                "overs": [
                    { "over": 0, "deliveries": [
                        { "batter": "Z Crawley", "bowler": "JJ Bumrah", "non_striker": "BM Duckett",
                          "runs": { "batter": 0, "extras": 1, "total": 1 }, "extras": { "wides": 1 } }
                    ]}
                ]
            }
        ]
    })
}

pub fn target_match() -> Value {
    match_json(&["England", "India"], &["2025-06-20", "2025-06-21"], Some("Test"))
}

/// Builds an in-memory zip with the given `(name, bytes)` entries.
pub fn zip_archive(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, bytes) in entries {
        writer.start_file(*name, options).expect("start zip entry");
        writer.write_all(bytes).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

pub fn json_bytes(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).expect("serialize fixture")
}
