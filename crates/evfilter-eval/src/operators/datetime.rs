//! Date-time arithmetic
//!
//! Implements the `plus` and `minus` methods and time-period literals.
//!
//! A duration is either a millisecond count or a `TimePeriod` summed from a compound
//! literal. Application depends on the receiver representation:
//! - `EpochMillis` and `Date`: months move through the engine zone's calendar, then
//!   days and milliseconds are added as raw integers
//! - `Calendar`, `Zoned` and `Local`: wall-clock fields are shifted (months, then days,
//!   then milliseconds) and the result keeps the receiver's offset
//!
//! `minus(d)` applies the negated components in the same order as `plus(d)`, so
//! `x.minus(d1 + d2)` equals `x.minus(d1).minus(d2)` when `d2` carries no months.
//! `plus(d)` followed by `minus(d)` restores the receiver unless a month shift clamped
//! the day of month.

use crate::context::EvaluationContext;
use crate::engine::ExprEvaluator;
use crate::error::{EvalError, EvalResult};
use chrono::{DateTime, FixedOffset, Months, NaiveDateTime, TimeDelta, Utc};
use evfilter_expr::{DateTimeMethod, ExprNode, TimePeriodPart};
use evfilter_types::{CalendarDateTime, DateTimeValue, Numeric, TimePeriod, TimeUnit, Value};

impl ExprEvaluator {
    /// Evaluate `receiver.plus(duration)` / `receiver.minus(duration)`
    pub fn eval_datetime_method(
        &self,
        method: DateTimeMethod,
        receiver: &ExprNode,
        duration: &ExprNode,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<Value> {
        let receiver = self.evaluate(receiver, ctx)?;
        let duration = self.evaluate(duration, ctx)?;
        let Some(period) = duration_value(&duration)? else {
            return Ok(Value::Null);
        };
        let zone = ctx.evaluator().time_zone();
        match method {
            DateTimeMethod::Plus => plus(&receiver, &period, zone),
            DateTimeMethod::Minus => minus(&receiver, &period, zone),
        }
    }

    /// Sum the parts of a time-period literal; a null count yields null
    pub fn eval_time_period(
        &self,
        parts: &[TimePeriodPart],
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<Value> {
        let mut total = TimePeriod::ZERO;
        for part in parts {
            let count = self.evaluate(&part.count, ctx)?;
            let Some(period) = period_of(&count, part.unit)? else {
                return Ok(Value::Null);
            };
            total = total
                .checked_add(&period)
                .ok_or_else(|| EvalError::overflow("time period"))?;
        }
        Ok(Value::Duration(total))
    }
}

fn period_of(count: &Value, unit: TimeUnit) -> EvalResult<Option<TimePeriod>> {
    let period = match count {
        Value::Null => return Ok(None),
        Value::Integer(_) | Value::Long(_) | Value::Decimal(_) | Value::Double(_) => {
            match count.as_long() {
                Some(whole) => TimePeriod::of(whole, unit),
                None => Numeric::from_value(count)
                    .and_then(|n| n.to_f64())
                    .and_then(|f| TimePeriod::of_fractional(f, unit)),
            }
        }
        other => return Err(EvalError::type_mismatch("numeric", other.type_name())),
    };
    period
        .map(Some)
        .ok_or_else(|| EvalError::overflow(format!("{} {}", count, unit)))
}

/// Interpret an evaluated duration operand; integers count milliseconds
pub fn duration_value(duration: &Value) -> EvalResult<Option<TimePeriod>> {
    match duration {
        Value::Duration(period) => Ok(Some(*period)),
        other => period_of(other, TimeUnit::Millisecond),
    }
}

/// Shift a date-time value forward by `period`; a null receiver yields null
pub fn plus(receiver: &Value, period: &TimePeriod, zone: FixedOffset) -> EvalResult<Value> {
    shift(receiver, period, zone)
}

/// Shift a date-time value backward by `period`; a null receiver yields null
pub fn minus(receiver: &Value, period: &TimePeriod, zone: FixedOffset) -> EvalResult<Value> {
    let negated = period
        .checked_neg()
        .ok_or_else(|| EvalError::overflow(format!("minus {}", period)))?;
    shift(receiver, &negated, zone)
}

/// Apply months, then days, then milliseconds
fn shift(receiver: &Value, period: &TimePeriod, zone: FixedOffset) -> EvalResult<Value> {
    let out_of_range = || EvalError::invalid_datetime(format!("{} shifted by {}", receiver, period));
    let value = match receiver {
        Value::Null => Value::Null,
        Value::Long(millis) => {
            Value::Long(shift_millis(*millis, period, zone).ok_or_else(out_of_range)?)
        }
        Value::DateTime(DateTimeValue::Date(dt)) => {
            let millis = shift_millis(dt.timestamp_millis(), period, zone)
                .ok_or_else(out_of_range)?;
            let shifted = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(out_of_range)?;
            Value::DateTime(DateTimeValue::Date(shifted))
        }
        Value::DateTime(DateTimeValue::Calendar(cal)) => {
            let offset = cal.offset();
            let local = cal
                .to_local()
                .and_then(|local| shift_local(local, period))
                .ok_or_else(out_of_range)?;
            let shifted = CalendarDateTime::from_local(local, offset).ok_or_else(out_of_range)?;
            Value::DateTime(DateTimeValue::Calendar(shifted))
        }
        Value::DateTime(DateTimeValue::Zoned(dt)) => {
            let local = shift_local(dt.naive_local(), period).ok_or_else(out_of_range)?;
            let shifted = local
                .and_local_timezone(*dt.offset())
                .single()
                .ok_or_else(out_of_range)?;
            Value::DateTime(DateTimeValue::Zoned(shifted))
        }
        Value::DateTime(DateTimeValue::Local(local)) => {
            let shifted = shift_local(*local, period).ok_or_else(out_of_range)?;
            Value::DateTime(DateTimeValue::Local(shifted))
        }
        other => return Err(EvalError::type_mismatch("date-time", other.type_name())),
    };
    Ok(value)
}

/// Raw integer shift; months go through the calendar of `zone`
fn shift_millis(millis: i64, period: &TimePeriod, zone: FixedOffset) -> Option<i64> {
    let delta = period.day_time_millis()?;
    if period.months == 0 {
        return millis.checked_add(delta);
    }
    let local = DateTime::from_timestamp_millis(millis)?
        .with_timezone(&zone)
        .naive_local();
    add_months(local, period.months)?
        .and_local_timezone(zone)
        .single()?
        .timestamp_millis()
        .checked_add(delta)
}

/// Shift wall-clock fields, rolling day/month/year over
fn shift_local(local: NaiveDateTime, period: &TimePeriod) -> Option<NaiveDateTime> {
    add_months(local, period.months)?
        .checked_add_signed(TimeDelta::try_days(period.days)?)?
        .checked_add_signed(TimeDelta::try_milliseconds(period.millis)?)
}

/// Calendar month shift; the day of month is clamped to the target month's length
fn add_months(local: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let count = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        local.checked_add_months(count)
    } else {
        local.checked_sub_months(count)
    }
}
