use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

// Fuso da loja (Brasília, sem horário de verão)
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -3;

/// Converte instantes UTC para o dia civil da loja.
/// Vendas, filtros de período e "hoje" usam sempre este relógio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessClock {
    offset: FixedOffset,
}

impl BusinessClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// `None` se o deslocamento passar de ±23h.
    pub fn from_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours.checked_mul(3600)?).map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn local(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(&self.offset)
    }

    pub fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        self.local(at).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.day_of(Utc::now())
    }
}

impl Default for BusinessClock {
    fn default() -> Self {
        Self::from_hours(DEFAULT_UTC_OFFSET_HOURS)
            .unwrap_or_else(|| Self::new(Utc.fix()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn evening_sale_in_brazil_stays_on_the_same_day() {
        let clock = BusinessClock::default();
        // 22:30 em Brasília = 01:30 UTC do dia seguinte
        let at = Utc.with_ymd_and_hms(2025, 1, 11, 1, 30, 0).unwrap();
        assert_eq!(clock.day_of(at), NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
    }

    #[test]
    fn offset_out_of_range_is_refused() {
        assert!(BusinessClock::from_hours(30).is_none());
        assert_eq!(BusinessClock::from_hours(0).map(|c| c.offset().local_minus_utc()), Some(0));
    }
}
