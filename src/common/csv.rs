// src/common/csv.rs

// Excel PT-BR espera ';' como separador e BOM para reconhecer UTF-8
const SEPARATOR: char = ';';
const RECORD_END: &str = "\r\n";
const BOM: char = '\u{FEFF}';

/// Monta um CSV em memória, registro a registro.
pub struct CsvBuilder {
    buffer: String,
    records: usize,
}

impl CsvBuilder {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut builder = Self {
            buffer: String::from(BOM),
            records: 0,
        };
        builder.push_record(headers);
        builder
    }

    pub fn push_record<S: AsRef<str>>(&mut self, cells: &[S]) {
        if self.records > 0 {
            self.buffer.push_str(RECORD_END);
        }
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                self.buffer.push(SEPARATOR);
            }
            self.buffer.push_str(&escape_cell(cell.as_ref()));
        }
        self.records += 1;
    }

    /// Número de registros, incluindo o cabeçalho.
    #[cfg(test)]
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

/// Aspas duplicadas e célula entre aspas quando há separador, vírgula, aspas ou quebra de linha.
pub fn escape_cell(cell: &str) -> String {
    let needs_quotes = cell.contains(['\n', '\r', ',', SEPARATOR, '"']);
    let escaped = cell.replace('"', "\"\"");
    if needs_quotes {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("simples", "simples")]
    #[case("a;b", "\"a;b\"")]
    #[case("a,b", "\"a,b\"")]
    #[case("diz \"oi\"", "\"diz \"\"oi\"\"\"")]
    #[case("linha1\nlinha2", "\"linha1\nlinha2\"")]
    #[case("", "")]
    fn escapes_cells(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_cell(input), expected);
    }

    #[test]
    fn starts_with_bom_and_separates_records_with_crlf() {
        let mut csv = CsvBuilder::new(&["A", "B"]);
        csv.push_record(&["1", "2"]);
        assert_eq!(csv.records(), 2);
        assert_eq!(csv.finish(), "\u{FEFF}A;B\r\n1;2");
    }
}
