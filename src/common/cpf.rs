// src/common/cpf.rs

use std::fmt;

use serde::Serialize;

use crate::common::error::AppError;

/// CPF normalizado: sempre 11 dígitos, sem pontuação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Valida o CPF digitado. Apenas formato: 11 dígitos e não todos iguais.
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let digits = normalize(input);

        if digits.len() != 11 {
            return Err(AppError::InvalidCpf("CPF deve ter 11 dígitos."));
        }

        let first = digits.as_bytes()[0];
        if digits.bytes().all(|b| b == first) {
            return Err(AppError::InvalidCpf("CPF inválido."));
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Formato de exibição: 000.000.000-00
    pub fn formatted(&self) -> String {
        let d = &self.0;
        format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remove tudo que não for dígito ("111.444.777-35" -> "11144477735").
pub fn normalize(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("11144477735")]
    #[case("111.444.777-35")]
    #[case(" 111 444 777 35 ")]
    fn accepts_eleven_digits_with_any_punctuation(#[case] input: &str) {
        let cpf = Cpf::parse(input).expect("cpf válido");
        assert_eq!(cpf.as_str(), "11144477735");
        assert_eq!(cpf.formatted(), "111.444.777-35");
    }

    #[rstest]
    #[case("", "CPF deve ter 11 dígitos.")]
    #[case("1234567890", "CPF deve ter 11 dígitos.")]
    #[case("123456789012", "CPF deve ter 11 dígitos.")]
    #[case("00000000000", "CPF inválido.")]
    #[case("999.999.999-99", "CPF inválido.")]
    fn rejects_malformed_cpf(#[case] input: &str, #[case] message: &str) {
        let err = Cpf::parse(input).expect_err("cpf deveria ser rejeitado");
        assert!(matches!(err, AppError::InvalidCpf(m) if m == message));
    }
}
