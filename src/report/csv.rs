use std::io::{Read, Write};

use crate::model::{AntibodyField, AntibodyRecord};

pub fn write_inventory_csv<W: Write>(
    records: &[AntibodyRecord],
    writer: W,
) -> Result<(), csv::Error> {
    let mut w = csv::Writer::from_writer(writer);
    if records.is_empty() {
        w.write_record(AntibodyField::all().iter().map(|f| f.name()))?;
    }
    for record in records {
        w.serialize(record)?;
    }
    w.flush()?;
    Ok(())
}

pub fn inventory_csv_string(records: &[AntibodyRecord]) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_inventory_csv(records, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn read_inventory_csv<R: Read>(reader: R) -> Result<Vec<AntibodyRecord>, csv::Error> {
    let mut r = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for row in r.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
