//! CSV export for ranked station results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::ranking::RankedStation;

/// Column header for ranked-station CSV export.
const HEADER: &str = "rank,id,name,lat,lng,distance_km,travel_eta_min,\
                      est_wait_min,queue_length,reliability";

/// Exports ranked stations to a CSV file at the given path.
///
/// Rows appear in rank order, starting at rank 1.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(ranked: &[RankedStation], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(ranked, buf)
}

/// Writes ranked stations as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(ranked: &[RankedStation], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for (i, r) in ranked.iter().enumerate() {
        let s = &r.station;
        wtr.write_record(&[
            (i + 1).to_string(),
            s.id.clone(),
            s.name.clone(),
            format!("{:.4}", s.lat),
            format!("{:.4}", s.lng),
            format!("{:.3}", r.distance_km),
            r.travel_eta_min.to_string(),
            r.est_wait_min.to_string(),
            s.queue_length.to_string(),
            format!("{:.3}", s.reliability),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
