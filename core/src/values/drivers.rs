//! Database driver implementations for Value

//------------------------------------------------------------------------------
// postgres ToSql / FromSql implementations
// Values are converted to the type the server reports for each parameter, so an
// `Integer` binds to `int4` as readily as to `int8`.
//------------------------------------------------------------------------------

#[cfg(feature = "postgres-sync")]
mod postgres_impl {
    use crate::values::Value;

    use bytes::BytesMut;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
    use postgres::types::{FromSql, IsNull, ToSql, Type};
    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use std::error::Error;

    type BoxError = Box<dyn Error + Sync + Send>;

    fn is_text(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN
        )
    }

    fn mismatch(value: &Value, ty: &Type) -> BoxError {
        format!("cannot bind {} value to parameter of type {}", value.kind(), ty).into()
    }

    /// Parses textual input (e.g. CSV cells) into the parameter's type.
    fn coerce_text(s: &str, ty: &Type) -> Result<Value, BoxError> {
        let value = match *ty {
            Type::BOOL => Value::Boolean(s.parse()?),
            Type::INT2 | Type::INT4 | Type::INT8 => Value::Integer(s.parse()?),
            Type::FLOAT4 | Type::FLOAT8 => Value::Float(s.parse()?),
            Type::NUMERIC => Value::Decimal(s.parse()?),
            Type::DATE => Value::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d")?),
            Type::TIMESTAMP | Type::TIMESTAMPTZ => {
                let ts = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))?;
                Value::DateTime(ts)
            }
            Type::JSON | Type::JSONB => Value::Json(serde_json::from_str(s)?),
            _ => return Err(format!("cannot bind text value to parameter of type {}", ty).into()),
        };
        Ok(value)
    }

    impl ToSql for Value {
        fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
            if is_text(ty) && !self.is_null() {
                return self.to_string().to_sql(ty, out);
            }

            match self {
                Value::Null => Ok(IsNull::Yes),
                Value::Boolean(b) => match *ty {
                    Type::BOOL => b.to_sql(ty, out),
                    _ => Err(mismatch(self, ty)),
                },
                Value::Integer(i) => match *ty {
                    Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                    Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                    Type::INT8 => i.to_sql(ty, out),
                    Type::FLOAT4 => (*i as f32).to_sql(ty, out),
                    Type::FLOAT8 => (*i as f64).to_sql(ty, out),
                    Type::NUMERIC => Decimal::from(*i).to_sql(ty, out),
                    _ => Err(mismatch(self, ty)),
                },
                Value::Float(f) => match *ty {
                    Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                    Type::FLOAT8 => f.to_sql(ty, out),
                    Type::NUMERIC => Decimal::try_from(*f)?.to_sql(ty, out),
                    _ => Err(mismatch(self, ty)),
                },
                Value::Decimal(d) => match *ty {
                    Type::NUMERIC => d.to_sql(ty, out),
                    Type::FLOAT4 | Type::FLOAT8 => d
                        .to_f64()
                        .ok_or_else(|| mismatch(self, ty))?
                        .to_sql(ty, out),
                    Type::INT8 if d.fract().is_zero() => d
                        .to_i64()
                        .ok_or_else(|| mismatch(self, ty))?
                        .to_sql(ty, out),
                    _ => Err(mismatch(self, ty)),
                },
                Value::Text(s) => coerce_text(s.trim(), ty)?.to_sql(ty, out),
                Value::Date(d) => match *ty {
                    Type::DATE => d.to_sql(ty, out),
                    Type::TIMESTAMP => d.and_time(NaiveTime::MIN).to_sql(ty, out),
                    _ => Err(mismatch(self, ty)),
                },
                Value::DateTime(ts) => match *ty {
                    Type::TIMESTAMP => ts.to_sql(ty, out),
                    Type::TIMESTAMPTZ => ts.and_utc().to_sql(ty, out),
                    Type::DATE => ts.date().to_sql(ty, out),
                    _ => Err(mismatch(self, ty)),
                },
                Value::Json(json) => match *ty {
                    Type::JSON | Type::JSONB => json.to_sql(ty, out),
                    _ => Err(mismatch(self, ty)),
                },
            }
        }

        fn accepts(ty: &Type) -> bool {
            is_text(ty)
                || matches!(
                    *ty,
                    Type::BOOL
                        | Type::INT2
                        | Type::INT4
                        | Type::INT8
                        | Type::FLOAT4
                        | Type::FLOAT8
                        | Type::NUMERIC
                        | Type::DATE
                        | Type::TIMESTAMP
                        | Type::TIMESTAMPTZ
                        | Type::JSON
                        | Type::JSONB
                )
        }

        postgres::types::to_sql_checked!();
    }

    impl<'a> FromSql<'a> for Value {
        fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
            let value = match *ty {
                Type::BOOL => Value::Boolean(bool::from_sql(ty, raw)?),
                Type::INT2 => Value::Integer(i16::from_sql(ty, raw)? as i64),
                Type::INT4 => Value::Integer(i32::from_sql(ty, raw)? as i64),
                Type::INT8 => Value::Integer(i64::from_sql(ty, raw)?),
                Type::OID => Value::Integer(u32::from_sql(ty, raw)? as i64),
                Type::FLOAT4 => Value::Float(f32::from_sql(ty, raw)? as f64),
                Type::FLOAT8 => Value::Float(f64::from_sql(ty, raw)?),
                Type::NUMERIC => Value::Decimal(Decimal::from_sql(ty, raw)?),
                Type::DATE => Value::Date(NaiveDate::from_sql(ty, raw)?),
                Type::TIMESTAMP => Value::DateTime(NaiveDateTime::from_sql(ty, raw)?),
                Type::TIMESTAMPTZ => Value::DateTime(DateTime::<Utc>::from_sql(ty, raw)?.naive_utc()),
                Type::JSON | Type::JSONB => Value::Json(serde_json::Value::from_sql(ty, raw)?),
                _ if is_text(ty) => Value::Text(String::from_sql(ty, raw)?),
                _ => return Err(format!("unsupported column type {}", ty).into()),
            };
            Ok(value)
        }

        fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
            Ok(Value::Null)
        }

        fn accepts(ty: &Type) -> bool {
            *ty == Type::OID || <Value as ToSql>::accepts(ty)
        }
    }

}
