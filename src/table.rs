use anyhow::{anyhow, Result};
use geobatch_core::entities::CoordinateOutcome;
use std::{io, path::Path};

pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";

/// A CSV table with a header row.
#[derive(Debug)]
pub struct Table {
    headers: csv::StringRecord,
    records: Vec<csv::StringRecord>,
}

impl Table {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|err| anyhow!("Unable to open {}: {err}", path.display()))?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();
        let records = rdr.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { headers, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All cells of the named column, one per row.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name).ok_or_else(|| {
            let available = self.headers.iter().collect::<Vec<_>>().join(", ");
            anyhow!("Column '{name}' not found (available: {available})")
        })?;
        Ok(self
            .records
            .iter()
            .map(|record| record.get(idx).unwrap_or_default())
            .collect())
    }

    /// Writes the table with `latitude` and `longitude` columns.
    ///
    /// Existing columns of the same name are overwritten, otherwise
    /// they are appended. Unresolved rows get empty cells.
    pub fn write_with_coordinates<W: io::Write>(
        &self,
        outcomes: &[CoordinateOutcome],
        writer: W,
    ) -> Result<()> {
        if outcomes.len() != self.records.len() {
            return Err(anyhow!(
                "Expected {} coordinates, got {}",
                self.records.len(),
                outcomes.len()
            ));
        }
        let mut headers: Vec<String> = self.headers.iter().map(ToOwned::to_owned).collect();
        let lat_idx = column_index_or_append(&mut headers, LATITUDE_COLUMN);
        let lng_idx = column_index_or_append(&mut headers, LONGITUDE_COLUMN);

        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&headers)?;
        for (record, outcome) in self.records.iter().zip(outcomes) {
            let mut row: Vec<String> = record.iter().map(ToOwned::to_owned).collect();
            row.resize(headers.len(), String::new());
            let (lat, lng) = match outcome.to_lat_lng_deg() {
                Some((lat, lng)) => (lat.to_string(), lng.to_string()),
                None => (String::new(), String::new()),
            };
            row[lat_idx] = lat;
            row[lng_idx] = lng;
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn column_index_or_append(headers: &mut Vec<String>, name: &str) -> usize {
    match headers.iter().position(|h| h == name) {
        Some(idx) => idx,
        None => {
            headers.push(name.to_owned());
            headers.len() - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geobatch_core::entities::MapPoint;

    const ADDRESSES: &str = "\
ID,ENDERECO
1,\"Av. Paulista, 1578 - Bela Vista, São Paulo - SP, 01310-200\"
2,
3,\"Praça da Sé, s/n - Sé, São Paulo - SP, 01001-000\"
";

    fn resolved(lat: f64, lng: f64) -> CoordinateOutcome {
        CoordinateOutcome::Resolved(MapPoint::from_lat_lng_deg(lat, lng))
    }

    #[test]
    fn read_address_column() {
        let table = Table::from_reader(ADDRESSES.as_bytes()).unwrap();
        assert_eq!(3, table.len());
        let column = table.column("ENDERECO").unwrap();
        assert_eq!(
            vec![
                "Av. Paulista, 1578 - Bela Vista, São Paulo - SP, 01310-200",
                "",
                "Praça da Sé, s/n - Sé, São Paulo - SP, 01001-000"
            ],
            column
        );
    }

    #[test]
    fn missing_column() {
        let table = Table::from_reader(ADDRESSES.as_bytes()).unwrap();
        let err = table.column("ADDRESS").unwrap_err();
        assert!(err.to_string().contains("ID, ENDERECO"));
    }

    #[test]
    fn append_coordinate_columns() {
        let table = Table::from_reader(ADDRESSES.as_bytes()).unwrap();
        let outcomes = [
            resolved(-23.5614, -46.6559),
            CoordinateOutcome::Unresolved,
            resolved(-23.5503, -46.6339),
        ];
        let mut out = Vec::new();
        table.write_with_coordinates(&outcomes, &mut out).unwrap();
        let expected = "\
ID,ENDERECO,latitude,longitude
1,\"Av. Paulista, 1578 - Bela Vista, São Paulo - SP, 01310-200\",-23.5614,-46.6559
2,,,
3,\"Praça da Sé, s/n - Sé, São Paulo - SP, 01001-000\",-23.5503,-46.6339
";
        assert_eq!(expected, String::from_utf8(out).unwrap());
    }

    #[test]
    fn overwrite_existing_coordinate_columns() {
        let input = "latitude,name,longitude\n1,a,2\n";
        let table = Table::from_reader(input.as_bytes()).unwrap();
        let mut out = Vec::new();
        table
            .write_with_coordinates(&[resolved(10.5, 20.25)], &mut out)
            .unwrap();
        assert_eq!(
            "latitude,name,longitude\n10.5,a,20.25\n",
            String::from_utf8(out).unwrap()
        );
    }

    #[test]
    fn reject_misaligned_outcomes() {
        let table = Table::from_reader(ADDRESSES.as_bytes()).unwrap();
        let mut out = Vec::new();
        assert!(table
            .write_with_coordinates(&[CoordinateOutcome::Unresolved], &mut out)
            .is_err());
    }
}
