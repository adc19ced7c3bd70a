/// The Hijri calendar date delivered alongside the day's timings.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct HijriDate {
    day: String,
    month: HijriMonth,
    year: String,
    weekday: HijriWeekday,
    #[serde(default)]
    designation: Option<Designation>,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct HijriMonth {
    #[serde(default)]
    number: Option<u8>,
    en: String,
    ar: String,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct HijriWeekday {
    en: String,
    #[serde(default)]
    ar: String,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct Designation {
    abbreviated: String,
    expanded: String,
}

impl HijriDate {
    pub fn day(&self) -> &str { &self.day }
    pub fn year(&self) -> &str { &self.year }
    pub fn month_en(&self) -> &str { &self.month.en }
    pub fn month_ar(&self) -> &str { &self.month.ar }
    pub fn weekday_en(&self) -> &str { &self.weekday.en }

    /// e.g. `"14 Ramaḍān 1446 (Al Juma'a)"`
    pub fn formatted(&self) -> String {
        format!("{} {} {} ({})", self.day, self.month.en, self.year, self.weekday.en)
    }

    /// e.g. `"14 رَمَضان 1446"`
    pub fn formatted_ar(&self) -> String {
        format!("{} {} {}", self.day, self.month.ar, self.year)
    }
}
