#![allow(dead_code)]

use serde_json::{json, Value};
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

/// One innings of three deliveries, the last one a run out.
pub fn series_match(teams: [&str; 2], date: &str) -> Value {
    json!({
        "info": {
            "match_type": "Test",
            "teams": teams,
            "dates": [date],
            "venue": "Edgbaston, Birmingham",
            "city": "Birmingham",
            "season": "2025",
            "event": { "name": "India tour of England", "match_number": 2 }
        },
        "innings": [
            {
                "team": teams[0],
                "overs": [
                    { "over": 0, "deliveries": [
                        { "batter": "Z Crawley", "bowler": "Akash Deep", "non_striker": "BM Duckett",
                          "runs": { "batter": 1, "extras": 0, "total": 1 } },
                        { "batter": "BM Duckett", "bowler": "Akash Deep", "non_striker": "Z Crawley",
                          "runs": { "batter": 0, "extras": 0, "total": 0 } },
                        { "batter": "BM Duckett", "bowler": "Akash Deep", "non_striker": "Z Crawley",
                          "runs": { "batter": 0, "extras": 0, "total": 0 },
                          "wickets": [ { "kind": "run out", "player_out": "Z Crawley",
                                         "fielders": [ { "name": "RA Jadeja" }, { "name": "RR Pant" } ] } ] }
                    ]}
                ]
            }
        ]
    })
}

/// Writes a zip with the given `(name, document)` entries to `path`.
pub fn write_archive(path: &Path, entries: &[(&str, Value)]) {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, document) in entries {
        writer.start_file(*name, options).expect("start zip entry");
        writer
            .write_all(&serde_json::to_vec(document).expect("serialize fixture"))
            .expect("write zip entry");
    }
    let bytes = writer.finish().expect("finish zip").into_inner();
    std::fs::write(path, bytes).expect("write archive");
}
