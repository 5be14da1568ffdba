use std::fmt;

/// A column datatype, as understood from the source document's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    Decimal,
    Float,
    Double,
    Real,
    Bit,
    Boolean,
    Date,
    DateTime,
    Timestamp,
    Time,
    Year,
    Char,
    VarChar,
    Binary,
    VarBinary,
    TinyText,
    Text,
    MediumText,
    LongText,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
    Enum,
    Set,
    Json,
    Geometry,
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,

    /// A user-defined or unsupported type; holds the normalized token.
    Unknown(String),
}

/// Source tokens, lowercase, mapped to their datatype.
const TOKENS: &[(&str, DataType)] = &[
    ("tinyint", DataType::TinyInt),
    ("smallint", DataType::SmallInt),
    ("mediumint", DataType::MediumInt),
    ("int", DataType::Int),
    ("integer", DataType::Int),
    ("bigint", DataType::BigInt),
    ("decimal", DataType::Decimal),
    ("dec", DataType::Decimal),
    ("numeric", DataType::Decimal),
    ("fixed", DataType::Decimal),
    ("float", DataType::Float),
    ("double", DataType::Double),
    ("double precision", DataType::Double),
    ("real", DataType::Real),
    ("bit", DataType::Bit),
    ("bool", DataType::Boolean),
    ("boolean", DataType::Boolean),
    ("date", DataType::Date),
    ("datetime", DataType::DateTime),
    ("timestamp", DataType::Timestamp),
    ("time", DataType::Time),
    ("year", DataType::Year),
    ("char", DataType::Char),
    ("nchar", DataType::Char),
    ("varchar", DataType::VarChar),
    ("nvarchar", DataType::VarChar),
    ("binary", DataType::Binary),
    ("varbinary", DataType::VarBinary),
    ("tinytext", DataType::TinyText),
    ("text", DataType::Text),
    ("mediumtext", DataType::MediumText),
    ("longtext", DataType::LongText),
    ("tinyblob", DataType::TinyBlob),
    ("blob", DataType::Blob),
    ("mediumblob", DataType::MediumBlob),
    ("longblob", DataType::LongBlob),
    ("enum", DataType::Enum),
    ("set", DataType::Set),
    ("json", DataType::Json),
    ("geometry", DataType::Geometry),
    ("point", DataType::Point),
    ("linestring", DataType::LineString),
    ("polygon", DataType::Polygon),
    ("multipoint", DataType::MultiPoint),
    ("multilinestring", DataType::MultiLineString),
    ("multipolygon", DataType::MultiPolygon),
    ("geometrycollection", DataType::GeometryCollection),
];

impl DataType {
    /// Maps a source datatype token to a [`DataType`].
    ///
    /// Accepts plain tokens (`VARCHAR`), qualified Workbench identifiers
    /// (`com.mysql.rdbms.mysql.datatype.varchar`), and tokens carrying a
    /// length suffix (`varchar(45)`).
    pub fn from_token(token: &str) -> DataType {
        let token = token.trim();
        let token = token.rsplit('.').next().unwrap_or(token);
        let token = match token.find('(') {
            Some(i) => &token[..i],
            None => token,
        };
        let token = token.trim().to_ascii_lowercase();
        let token = token.strip_suffix(" unsigned").unwrap_or(&token);

        TOKENS
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, ty)| ty.clone())
            .unwrap_or_else(|| DataType::Unknown(token.to_string()))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, DataType::Unknown(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::TinyInt
                | DataType::SmallInt
                | DataType::MediumInt
                | DataType::Int
                | DataType::BigInt
                | DataType::Year
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer()
            || matches!(
                self,
                DataType::Decimal | DataType::Float | DataType::Double | DataType::Real
            )
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            DataType::Char
                | DataType::VarChar
                | DataType::TinyText
                | DataType::Text
                | DataType::MediumText
                | DataType::LongText
                | DataType::Enum
                | DataType::Set
        )
    }

    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            DataType::Binary
                | DataType::VarBinary
                | DataType::TinyBlob
                | DataType::Blob
                | DataType::MediumBlob
                | DataType::LongBlob
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            DataType::Date | DataType::DateTime | DataType::Timestamp | DataType::Time
        )
    }

    pub fn is_spatial(&self) -> bool {
        matches!(
            self,
            DataType::Geometry
                | DataType::Point
                | DataType::LineString
                | DataType::Polygon
                | DataType::MultiPoint
                | DataType::MultiLineString
                | DataType::MultiPolygon
                | DataType::GeometryCollection
        )
    }

    /// The canonical lowercase token.
    pub fn as_str(&self) -> &str {
        match self {
            DataType::Unknown(token) => token,
            ty => TOKENS
                .iter()
                .find(|(_, candidate)| candidate == ty)
                .map(|(name, _)| *name)
                .unwrap_or("unknown"),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_tokens() {
        assert_eq!(
            DataType::from_token("com.mysql.rdbms.mysql.datatype.varchar"),
            DataType::VarChar
        );
        assert_eq!(DataType::from_token("INT"), DataType::Int);
        assert_eq!(DataType::from_token("varchar(45)"), DataType::VarChar);
        assert_eq!(DataType::from_token("int unsigned"), DataType::Int);
    }

    #[test]
    fn unknown_token_keeps_name() {
        let ty = DataType::from_token("com.mysql.rdbms.mysql.userdatatype.money");
        assert_eq!(ty, DataType::Unknown("money".to_string()));
        assert_eq!(ty.as_str(), "money");
    }

    #[test]
    fn canonical_name_is_first_alias() {
        assert_eq!(DataType::Int.as_str(), "int");
        assert_eq!(DataType::Decimal.as_str(), "decimal");
    }
}
