//! Static code tables and fixed-boundary binning for the ENEM microdata.

/// Column names used by the cleaner and the aggregators.
pub mod col {
    pub const SEX_CODE: &str = "TP_SEXO";
    pub const RACE_CODE: &str = "TP_COR_RACA";
    pub const SCHOOL_TYPE_CODE: &str = "TP_ESCOLA";
    pub const SCHOOL_ADMIN_CODE: &str = "TP_DEPENDENCIA_ADM_ESC";
    pub const STATE: &str = "SG_UF_ESC";
    pub const AGE: &str = "NU_IDADE";
    pub const INCOME: &str = "Q006";

    pub const SCIENCE: &str = "NU_NOTA_CN";
    pub const HUMANITIES: &str = "NU_NOTA_CH";
    pub const LANGUAGES: &str = "NU_NOTA_LC";
    pub const MATH: &str = "NU_NOTA_MT";
    pub const ESSAY: &str = "NU_NOTA_REDACAO";

    pub const PRESENCE_SCIENCE: &str = "TP_PRESENCA_CN";
    pub const PRESENCE_HUMANITIES: &str = "TP_PRESENCA_CH";
    pub const PRESENCE_LANGUAGES: &str = "TP_PRESENCA_LC";
    pub const PRESENCE_MATH: &str = "TP_PRESENCA_MT";

    // derived
    pub const SEX: &str = "SEXO";
    pub const RACE: &str = "COR_RACA";
    pub const SCHOOL_TYPE: &str = "TIPO_ESCOLA";
    pub const SCHOOL_ADMIN: &str = "DEPENDENCIA_ESCOLA";
    pub const REGION: &str = "REGIAO";
    pub const AGE_BRACKET: &str = "FAIXA_ETARIA";
    pub const INCOME_ORDINAL: &str = "Q006_NUM";
    pub const SOCIO_TIER: &str = "NIVEL_SOCIOECONOMICO";
    pub const OBJECTIVE_MEAN: &str = "MEDIA_OBJETIVAS";
}

/// Source columns the cleaner reads. The loader drops every other column.
pub const SOURCE_COLUMNS: [&str; 16] = [
    col::SEX_CODE,
    col::RACE_CODE,
    col::SCHOOL_TYPE_CODE,
    col::SCHOOL_ADMIN_CODE,
    col::STATE,
    col::AGE,
    col::INCOME,
    col::SCIENCE,
    col::HUMANITIES,
    col::LANGUAGES,
    col::MATH,
    col::ESSAY,
    col::PRESENCE_SCIENCE,
    col::PRESENCE_HUMANITIES,
    col::PRESENCE_LANGUAGES,
    col::PRESENCE_MATH,
];

pub fn is_source_column(name: &str) -> bool {
    SOURCE_COLUMNS.contains(&name)
}

/// Every score column, objective subjects first and the essay last.
pub const SCORE_COLUMNS: [&str; 5] = [
    col::SCIENCE,
    col::HUMANITIES,
    col::LANGUAGES,
    col::MATH,
    col::ESSAY,
];

pub const OBJECTIVE_COLUMNS: [&str; 4] = [col::SCIENCE, col::HUMANITIES, col::LANGUAGES, col::MATH];

pub const PRESENCE_COLUMNS: [&str; 4] = [
    col::PRESENCE_SCIENCE,
    col::PRESENCE_HUMANITIES,
    col::PRESENCE_LANGUAGES,
    col::PRESENCE_MATH,
];

/// Attendance code for a participant who sat the test.
pub const PRESENT: i64 = 1;

pub const SEX_LABELS: &[(i64, &str)] = &[(1, "Masculino"), (2, "Feminino")];

pub const RACE_LABELS: &[(i64, &str)] = &[
    (1, "Não declarado"),
    (2, "Branca"),
    (3, "Preta"),
    (4, "Parda"),
    (5, "Amarela"),
    (6, "Indígena"),
];

pub const SCHOOL_TYPE_LABELS: &[(i64, &str)] =
    &[(1, "Não Respondeu"), (2, "Pública"), (3, "Privada")];

pub const SCHOOL_ADMIN_LABELS: &[(i64, &str)] = &[
    (1, "Federal"),
    (2, "Estadual"),
    (3, "Municipal"),
    (4, "Privada"),
];

pub const REGIONS: &[(&str, &str)] = &[
    ("AC", "Norte"),
    ("AP", "Norte"),
    ("AM", "Norte"),
    ("PA", "Norte"),
    ("RO", "Norte"),
    ("RR", "Norte"),
    ("TO", "Norte"),
    ("AL", "Nordeste"),
    ("BA", "Nordeste"),
    ("CE", "Nordeste"),
    ("MA", "Nordeste"),
    ("PB", "Nordeste"),
    ("PE", "Nordeste"),
    ("PI", "Nordeste"),
    ("RN", "Nordeste"),
    ("SE", "Nordeste"),
    ("DF", "Centro-Oeste"),
    ("GO", "Centro-Oeste"),
    ("MT", "Centro-Oeste"),
    ("MS", "Centro-Oeste"),
    ("ES", "Sudeste"),
    ("MG", "Sudeste"),
    ("RJ", "Sudeste"),
    ("SP", "Sudeste"),
    ("PR", "Sul"),
    ("RS", "Sul"),
    ("SC", "Sul"),
];

/// Age brackets, youngest first.
pub const AGE_BRACKETS: [&str; 5] = ["Menor que 18", "18-19", "20-21", "22-25", "Mais de 25"];

/// Socioeconomic tiers, poorest first.
pub const SOCIO_TIERS: [&str; 5] = ["Muito Baixo", "Baixo", "Médio", "Alto", "Muito Alto"];

/// Human-readable subject name for a score column.
pub fn area_name(column: &str) -> &str {
    match column {
        col::SCIENCE => "Ciências da Natureza",
        col::HUMANITIES => "Ciências Humanas",
        col::LANGUAGES => "Linguagens",
        col::MATH => "Matemática",
        col::ESSAY => "Redação",
        other => other,
    }
}

/// Parses an integer code cell. Accepts `"2"`, `" 2 "` and `"2.0"`.
pub fn parse_code(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(code) = raw.parse::<i64>() {
        return Some(code);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 {
        Some(value as i64)
    } else {
        None
    }
}

/// Parses a numeric cell, mapping anything unparsable (or non-finite) to `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn decode(table: &[(i64, &'static str)], code: i64) -> Option<&'static str> {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Decodes a sex cell. Numeric codes and the `M`/`F` letters used by recent
/// editions of the microdata are both understood.
pub fn decode_sex(raw: &str) -> Option<&'static str> {
    match raw.trim() {
        "M" | "m" => Some("Masculino"),
        "F" | "f" => Some("Feminino"),
        other => parse_code(other).and_then(|c| decode(SEX_LABELS, c)),
    }
}

/// Region for a two-letter state code. Unknown codes have no region.
pub fn region_for(state: &str) -> Option<&'static str> {
    let state = state.trim();
    REGIONS
        .iter()
        .find(|(uf, _)| *uf == state)
        .map(|(_, region)| *region)
}

/// Assigns an age to its bracket. Bins are right-closed, outer bins open-ended.
///
/// | Age         | Bracket       |
/// |-------------|---------------|
/// | <= 17       | Menor que 18  |
/// | (17, 19]    | 18-19         |
/// | (19, 21]    | 20-21         |
/// | (21, 25]    | 22-25         |
/// | > 25        | Mais de 25    |
pub fn age_bracket(age: f64) -> Option<&'static str> {
    match age {
        a if a.is_nan() => None,
        a if a <= 17.0 => Some(AGE_BRACKETS[0]),
        a if a <= 19.0 => Some(AGE_BRACKETS[1]),
        a if a <= 21.0 => Some(AGE_BRACKETS[2]),
        a if a <= 25.0 => Some(AGE_BRACKETS[3]),
        _ => Some(AGE_BRACKETS[4]),
    }
}

/// Assigns a household-income ordinal to its socioeconomic tier.
///
/// | Ordinal     | Tier         |
/// |-------------|--------------|
/// | <= 2        | Muito Baixo  |
/// | (2, 4]      | Baixo        |
/// | (4, 6]      | Médio        |
/// | (6, 8]      | Alto         |
/// | > 8         | Muito Alto   |
pub fn socio_tier(ordinal: f64) -> Option<&'static str> {
    match ordinal {
        o if o.is_nan() => None,
        o if o <= 2.0 => Some(SOCIO_TIERS[0]),
        o if o <= 4.0 => Some(SOCIO_TIERS[1]),
        o if o <= 6.0 => Some(SOCIO_TIERS[2]),
        o if o <= 8.0 => Some(SOCIO_TIERS[3]),
        _ => Some(SOCIO_TIERS[4]),
    }
}

/// Household-income ordinal from a `Q006` cell.
///
/// Numeric cells are taken as-is; the letter codes `A`..`Q` of the published
/// questionnaire map to 1..17.
pub fn income_ordinal(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if let Some(value) = parse_number(raw) {
        return Some(value);
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if ('A'..='Q').contains(&c.to_ascii_uppercase()) => {
            Some((c.to_ascii_uppercase() as u8 - b'A' + 1) as f64)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_columns_cover_cleaner_inputs() {
        for c in SCORE_COLUMNS.iter().chain(&PRESENCE_COLUMNS) {
            assert!(is_source_column(c));
        }
        assert!(is_source_column(col::INCOME));
        assert!(!is_source_column("NU_INSCRICAO"));
        assert!(!is_source_column(col::REGION));
    }

    #[test]
    fn test_age_bracket_boundaries() {
        assert_eq!(age_bracket(0.0), Some("Menor que 18"));
        assert_eq!(age_bracket(17.0), Some("Menor que 18"));
        assert_eq!(age_bracket(17.5), Some("18-19"));
        assert_eq!(age_bracket(18.0), Some("18-19"));
        assert_eq!(age_bracket(19.0), Some("18-19"));
        assert_eq!(age_bracket(20.0), Some("20-21"));
        assert_eq!(age_bracket(21.0), Some("20-21"));
        assert_eq!(age_bracket(22.0), Some("22-25"));
        assert_eq!(age_bracket(25.0), Some("22-25"));
        assert_eq!(age_bracket(26.0), Some("Mais de 25"));
        assert_eq!(age_bracket(140.0), Some("Mais de 25"));
        assert_eq!(age_bracket(f64::NAN), None);
    }

    #[test]
    fn test_age_bracket_is_total_and_ordered() {
        let mut previous = 0;
        for tenth in -50..=1200 {
            let age = tenth as f64 / 10.0;
            let bracket = age_bracket(age).expect("every age has a bracket");
            let idx = AGE_BRACKETS.iter().position(|b| *b == bracket).unwrap();
            assert!(idx >= previous, "brackets must not go backwards at {age}");
            previous = idx;
        }
        assert_eq!(previous, AGE_BRACKETS.len() - 1);
    }

    #[test]
    fn test_socio_tier_boundaries() {
        assert_eq!(socio_tier(1.0), Some("Muito Baixo"));
        assert_eq!(socio_tier(2.0), Some("Muito Baixo"));
        assert_eq!(socio_tier(3.0), Some("Baixo"));
        assert_eq!(socio_tier(4.0), Some("Baixo"));
        assert_eq!(socio_tier(5.0), Some("Médio"));
        assert_eq!(socio_tier(6.0), Some("Médio"));
        assert_eq!(socio_tier(7.0), Some("Alto"));
        assert_eq!(socio_tier(8.0), Some("Alto"));
        assert_eq!(socio_tier(9.0), Some("Muito Alto"));
        assert_eq!(socio_tier(17.0), Some("Muito Alto"));
        assert_eq!(socio_tier(f64::NAN), None);
    }

    #[test]
    fn test_socio_tier_has_no_gaps() {
        for tenth in -20..=200 {
            assert!(socio_tier(tenth as f64 / 10.0).is_some());
        }
    }

    #[test]
    fn test_region_lookup() {
        assert_eq!(REGIONS.len(), 27);
        assert_eq!(region_for("SP"), Some("Sudeste"));
        assert_eq!(region_for("AM"), Some("Norte"));
        assert_eq!(region_for("DF"), Some("Centro-Oeste"));
        assert_eq!(region_for("RS"), Some("Sul"));
        assert_eq!(region_for("BA"), Some("Nordeste"));
        assert_eq!(region_for("XX"), None);
        assert_eq!(region_for(""), None);
    }

    #[test]
    fn test_every_state_maps_to_a_known_region() {
        let regions = ["Norte", "Nordeste", "Centro-Oeste", "Sudeste", "Sul"];
        for (uf, _) in REGIONS {
            assert!(regions.contains(&region_for(uf).unwrap()));
        }
    }

    #[test]
    fn test_decode_codes() {
        assert_eq!(decode(RACE_LABELS, 4), Some("Parda"));
        assert_eq!(decode(SCHOOL_ADMIN_LABELS, 9), None);
        assert_eq!(decode_sex("1"), Some("Masculino"));
        assert_eq!(decode_sex("2.0"), Some("Feminino"));
        assert_eq!(decode_sex("F"), Some("Feminino"));
        assert_eq!(decode_sex("Masculino"), None);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_code(" 3 "), Some(3));
        assert_eq!(parse_code("1.0"), Some(1));
        assert_eq!(parse_code("1.5"), None);
        assert_eq!(parse_code(""), None);
        assert_eq!(parse_number("612.4"), Some(612.4));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_income_ordinal() {
        assert_eq!(income_ordinal("5"), Some(5.0));
        assert_eq!(income_ordinal("A"), Some(1.0));
        assert_eq!(income_ordinal("q"), Some(17.0));
        assert_eq!(income_ordinal("R"), None);
        assert_eq!(income_ordinal("AB"), None);
        assert_eq!(income_ordinal(""), None);
    }
}
