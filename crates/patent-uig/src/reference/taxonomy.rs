use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;

use super::{anchored_alternation, ReferenceError};

/// Trailing children of the domestic node that are Hong Kong, Macao and Taiwan.
pub const NON_MAINLAND_REGIONS: usize = 3;

/// A mainland province and its cities, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Province {
    pub name: String,
    pub cities: Vec<String>,
}

/// A foreign country (or non-mainland region) and its named states and cities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignCountry {
    pub name: String,
    pub places: Vec<String>,
}

/// Country → province → city tree plus the derived lookup tables.
#[derive(Debug)]
pub struct GeoTaxonomy {
    provinces: Vec<Province>,
    foreign: Vec<ForeignCountry>,
    postal_prefixes: HashMap<String, String>,
    province_pattern: Option<Regex>,
    foreign_pattern: Option<Regex>,
}

#[derive(Debug, Default)]
struct Node {
    name: Option<String>,
    zip_prefix: Option<String>,
    children: Vec<Node>,
}

impl Node {
    fn required_name(&self, what: &str) -> Result<&str, ReferenceError> {
        self.name
            .as_deref()
            .ok_or_else(|| ReferenceError::Structure(format!("{what} node without Name")))
    }

    fn child_names(&self, what: &str) -> Result<Vec<String>, ReferenceError> {
        self.children
            .iter()
            .map(|child| child.required_name(what).map(str::to_string))
            .collect()
    }
}

impl GeoTaxonomy {
    pub fn from_xml_str(document: &str) -> Result<Self, ReferenceError> {
        let root = parse_tree(document)?;
        Self::from_tree(root)
    }

    fn from_tree(root: Node) -> Result<Self, ReferenceError> {
        let mut countries = root.children.into_iter();
        let domestic = countries
            .next()
            .ok_or_else(|| ReferenceError::Structure("taxonomy has no country nodes".into()))?;

        if domestic.children.len() <= NON_MAINLAND_REGIONS {
            return Err(ReferenceError::Structure(format!(
                "domestic node needs provinces plus {NON_MAINLAND_REGIONS} non-mainland regions, found {} children",
                domestic.children.len()
            )));
        }

        let mainland_count = domestic.children.len() - NON_MAINLAND_REGIONS;
        let mut provinces = Vec::with_capacity(mainland_count);
        let mut postal_prefixes = HashMap::new();
        let mut foreign = Vec::new();

        for (index, node) in domestic.children.iter().enumerate() {
            let name = node.required_name("province")?.to_string();
            let cities = node.child_names("city")?;

            if index < mainland_count {
                if let Some(prefixes) = &node.zip_prefix {
                    for prefix in prefixes.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                        postal_prefixes.insert(prefix.to_string(), name.clone());
                    }
                }
                provinces.push(Province { name, cities });
            } else {
                foreign.push(ForeignCountry {
                    name,
                    places: cities,
                });
            }
        }

        for country in countries {
            let name = country.required_name("country")?.to_string();
            let mut places = Vec::new();
            for state in &country.children {
                if let Some(state_name) = &state.name {
                    places.push(state_name.clone());
                }
                places.extend(state.child_names("city")?);
            }
            foreign.push(ForeignCountry { name, places });
        }

        let province_pattern =
            anchored_alternation(provinces.iter().map(|province| province.name.as_str()))?;
        let foreign_pattern =
            anchored_alternation(foreign.iter().map(|country| country.name.as_str()))?;

        Ok(Self {
            provinces,
            foreign,
            postal_prefixes,
            province_pattern,
            foreign_pattern,
        })
    }

    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    /// Non-mainland regions first, then foreign countries, in document order.
    pub fn foreign_countries(&self) -> &[ForeignCountry] {
        &self.foreign
    }

    pub fn city_count(&self) -> usize {
        self.provinces
            .iter()
            .map(|province| province.cities.len())
            .sum()
    }

    /// Province whose name starts `text`.
    pub fn match_province<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.province_pattern
            .as_ref()
            .and_then(|pattern| pattern.find(text))
            .map(|found| found.as_str())
    }

    /// Foreign country or non-mainland region whose name starts `text`.
    pub fn match_foreign_country<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.foreign_pattern
            .as_ref()
            .and_then(|pattern| pattern.find(text))
            .map(|found| found.as_str())
    }

    /// Province owning the first city, in document order, that starts `text`.
    pub fn province_for_city_prefix(&self, text: &str) -> Option<&str> {
        self.provinces
            .iter()
            .find(|province| {
                province
                    .cities
                    .iter()
                    .any(|city| !city.is_empty() && text.starts_with(city.as_str()))
            })
            .map(|province| province.name.as_str())
    }

    /// Country owning the first foreign state or city, in document order, that starts `text`.
    pub fn country_for_place_prefix(&self, text: &str) -> Option<&str> {
        self.foreign
            .iter()
            .find(|country| {
                country
                    .places
                    .iter()
                    .any(|place| !place.is_empty() && text.starts_with(place.as_str()))
            })
            .map(|country| country.name.as_str())
    }

    pub fn province_for_postal_prefix(&self, prefix: &str) -> Option<&str> {
        self.postal_prefixes.get(prefix).map(String::as_str)
    }
}

fn parse_tree(document: &str) -> Result<Node, ReferenceError> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) => stack.push(node_from_element(&element)?),
            Event::Empty(element) => {
                let node = node_from_element(&element)?;
                attach(node, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| {
                    ReferenceError::Structure("unbalanced closing tag".into())
                })?;
                attach(node, &mut stack, &mut root)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ReferenceError::Structure("unclosed element at end of document".into()));
    }
    root.ok_or_else(|| ReferenceError::Structure("taxonomy document is empty".into()))
}

fn attach(node: Node, stack: &mut [Node], root: &mut Option<Node>) -> Result<(), ReferenceError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => {
            return Err(ReferenceError::Structure(
                "taxonomy document has more than one root element".into(),
            ))
        }
    }
    Ok(())
}

fn node_from_element(element: &BytesStart<'_>) -> Result<Node, ReferenceError> {
    let mut node = Node::default();
    for attr in element.attributes() {
        let attr = attr
            .map_err(|err| ReferenceError::Structure(format!("invalid attribute: {err}")))?;
        let target = match attr.key.as_ref() {
            b"Name" => &mut node.name,
            b"ZipPrefix" => &mut node.zip_prefix,
            _ => continue,
        };
        let value = String::from_utf8(attr.value.to_vec())
            .map_err(|err| ReferenceError::Structure(format!("attribute is not UTF-8: {err}")))?;
        *target = Some(value.trim().to_string());
    }
    Ok(node)
}
