//! Request-scoped lookup parameters

/// A numeric filter taken from the query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NumericParam {
    #[default]
    Absent,
    Value(u64),
    /// Present but not a non-negative integer
    Invalid(String),
}

impl NumericParam {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => NumericParam::Absent,
            // 只接受纯数字，"+5" 之类不算
            Some(s) if s.bytes().all(|b| b.is_ascii_digit()) => s
                .parse()
                .map(NumericParam::Value)
                .unwrap_or_else(|_| NumericParam::Invalid(s.to_string())),
            Some(s) => NumericParam::Invalid(s.to_string()),
        }
    }
}

/// Lookup parameters, immutable once parsed.
///
/// An empty value counts as an absent parameter. Text values are kept as
/// sent; lowercasing happens when the query is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupParams {
    pub search: Option<String>,
    pub term: Option<String>,
    /// Substring variant of `term`
    pub iterm: Option<String>,
    pub region_id: NumericParam,
    pub region_code: NumericParam,
    /// Raw `regions_only` value; only `"1"` enables the mode
    pub regions_only: Option<String>,
    /// Raw `cities_and_regions` value; only `"1"` enables the mode
    pub cities_and_regions: Option<String>,
    /// 1-based page number
    pub page: u32,
}

impl Default for LookupParams {
    fn default() -> Self {
        Self {
            search: None,
            term: None,
            iterm: None,
            region_id: NumericParam::Absent,
            region_code: NumericParam::Absent,
            regions_only: None,
            cities_and_regions: None,
            page: 1,
        }
    }
}

impl LookupParams {
    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// When a key repeats, the first occurrence wins.
    pub fn from_query_string(query: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut search = None;
        let mut term = None;
        let mut iterm = None;
        let mut region_id = None;
        let mut region_code = None;
        let mut regions_only = None;
        let mut cities_and_regions = None;
        let mut page = None;

        for (key, value) in pairs {
            let value = value.as_ref();
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "search" => &mut search,
                "term" => &mut term,
                "iterm" => &mut iterm,
                "region_id" => &mut region_id,
                "region_code" => &mut region_code,
                "regions_only" => &mut regions_only,
                "cities_and_regions" => &mut cities_and_regions,
                "page" => &mut page,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }

        Self {
            search,
            term,
            iterm,
            region_id: NumericParam::parse(region_id.as_deref()),
            region_code: NumericParam::parse(region_code.as_deref()),
            regions_only,
            cities_and_regions,
            page: parse_page(page.as_deref()),
        }
    }

    pub fn is_regions_only(&self) -> bool {
        self.regions_only.as_deref() == Some("1")
    }

    pub fn is_cities_and_regions(&self) -> bool {
        self.cities_and_regions.as_deref() == Some("1")
    }

    /// `search` switches the request to the paginated listing
    pub fn is_list_mode(&self) -> bool {
        self.search.is_some()
    }
}

/// Invalid, zero or negative pages read as page 1
fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
        .unwrap_or(1)
}
