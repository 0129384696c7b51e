//! Extraction evaluation suite — fixed customer messages and the fields a
//! model is expected to pull out of them.

use anyhow::{anyhow, Result};
use regex::Regex;

/// System context asking for one `FIELD: value` line per parameter.
pub const DEFAULT_CONTEXT: &str = "You are a system assistant that helps to support APIs with their correct parameters.
Please extract the needed data from the user input and always return it in the same format as defined here.
NAME: <User name that was identified>
MAIL: <User e-mail address that was identified. It should be validated to match common standard RFC 5322.>
ADDRESS: <Postal address that was identified>
ZIP: <Zip or postal code that was identified based on address, location and country>
LOCATION: <Location that was identified>
COUNTRY: <Country identified based on location and address in ISO-3166-1 two-letter standard>
REQUEST: <Actual request of the user that was identified. Can be either Order, Complaint or Info.>
PRODUCT: <Product the user refers to as it was identified>
DATE: <Date that was identified in ISO8601 format>
GPS: <Latitude and Longitude based on location>
TIMEZONE: <Timezone based on users location. Should match the timezone value defined in IANA/Olson database.>
In case you were not able to retrieve some parameter or the user did not provide it please return that value
as \"Unknown\", so for example if the GPS coordinates can't be retrieved the response shall be GPS: Unknown.";

pub const DEFAULT_PROMPT: &str = "Hello world, this is a great product so I'd like to order the Hummingbird 42. I am Jan from Berlin,
I'd like to be this shipped by 12th of August 2026 and my mail address is jan@foo.com and my address is
Mollstrasse 1 in 10117.";

/// Models the suite runs against when none are given.
pub const DEFAULT_MODELS: &[&str] = &[
    "llama-2-7b-chat-fp16",
    "phi-2",
    "gemma-7b-it",
    "mistral-7b-instruct-v0.2",
];

const BERLIN_ORDER: &[&str] = &[
    "NAME: Jan",
    "MAIL: jan@foo.com",
    "ADDRESS: Mollstrasse 1",
    "ZIP: 10117",
    "LOCATION: Berlin",
    "COUNTRY: DE",
    "REQUEST: Order",
    "PRODUCT: Hummingbird 42",
    "DATE: 2026-08-12",
    "TIMEZONE: Europe/Berlin",
];

/// One prompt and what a correct reply must (and must not) contain.
#[derive(Debug)]
pub struct Case {
    pub name: &'static str,
    pub prompt: &'static str,
    pub expect: &'static [&'static str],
    pub reject: &'static [&'static str],
    /// Require a `GPS:` line with coordinates around Berlin.
    pub check_gps: bool,
}

pub static CASES: &[Case] = &[
    Case {
        name: "default",
        prompt: DEFAULT_PROMPT,
        expect: BERLIN_ORDER,
        reject: &[],
        check_gps: false,
    },
    Case {
        name: "gps",
        prompt: DEFAULT_PROMPT,
        expect: &[],
        reject: &["GPS: Unknown"],
        check_gps: true,
    },
    Case {
        name: "small_town",
        prompt: "Hello world, this is a great product so I'd like to order the Hummingbird 42. I am Jan from Lençóis,
I'd like to be this shipped by 12th of August 2026 and my mail address is jan@foo.com and my address is
Rua José Florêncio 11 in 469600-000.",
        expect: &[
            "ADDRESS: Rua José Florêncio 11",
            "ZIP: 469600-000",
            "LOCATION: Lençóis",
            "COUNTRY: BR",
            "TIMEZONE: America/Bahia",
        ],
        reject: &[],
        check_gps: false,
    },
    Case {
        name: "missing_product",
        prompt: "Hello world, this is a great product so I'd like to order. I am Jan from Berlin,
I'd like to be this shipped by 12th of August 2026 and my mail address is jan@foo.com and my address is
Mollstrasse 1 in 10117.",
        expect: &["PRODUCT: Unknown"],
        reject: &[],
        check_gps: false,
    },
    Case {
        name: "language_german",
        prompt: "Hallo, dieses Produkt sieht nützlich aus, ich möchte das Hummingbird 42 gern bestellen.
Ich bin Jan aus Berlin, der Versand soll bis zum 12.August 2026 erfolgen. Meine Mailadresse ist
jan@foo.com und meine Postanschrift die Mollstrasse 1 in 10117 Berlin.",
        expect: BERLIN_ORDER,
        reject: &[],
        check_gps: false,
    },
    Case {
        name: "language_romanian",
        prompt: "Buna ziua, acest produs pare util, as dori sa comand Hummingbird 42.
Sunt Jan din Romania, expedierea ar trebui să aibă loc până pe 12 august 2026. Adresa mea de e-mail este
jan@foo.com și adresa mea poștală este Strada Tudor Vladimirescu 12 în Sinaia 106100.",
        expect: &[
            "NAME: Jan",
            "MAIL: jan@foo.com",
            "ADDRESS: Strada Tudor Vladimirescu 12",
            "ZIP: 106100",
            "LOCATION: Sinaia",
            "COUNTRY: RO",
            "REQUEST: Order",
            "PRODUCT: Hummingbird 42",
            "DATE: 2026-08-12",
            "TIMEZONE: Europe/Bucharest",
        ],
        reject: &[],
        check_gps: false,
    },
    Case {
        name: "invalid_request_type",
        prompt: "Hello world, I am not sure what I want here regarding the Hummingbird 42 but I am writing anyway
just to waste a little of your time. I am Jan from Berlin, my favourite date of them all is 12th of August 2026
and my mail address is jan@foo.com and my address is Mollstrasse 1 in 10117.",
        expect: &["REQUEST: Unknown"],
        reject: &[],
        check_gps: false,
    },
    Case {
        name: "typos",
        prompt: "Hello world, this is a great product so I'd like to oder the Hummingbird 42. I am Jan from Brli9n (capital
of Germany), I'd like to be this shipped by 34th of August 2026 and my mail address is jan-at-foo.com and my address is
Mollstrasse 1 in 10117.",
        expect: &[
            "MAIL: jan@foo.com",
            "LOCATION: Berlin",
            "COUNTRY: DE",
            "REQUEST: Order",
            "DATE: Unknown",
            "TIMEZONE: Europe/Berlin",
        ],
        reject: &[],
        check_gps: false,
    },
    Case {
        name: "complaint",
        prompt: "Hello world, I am very unhappy with the Hummingbird 42. I turned it on and all I see is some
flashing LED and that is it. Power supply seems to be working. I am Jan from Berlin and ordered the
product on 10th of October 2021 and my mail address is jan@foo.com.",
        expect: &[
            "MAIL: jan@foo.com",
            "PRODUCT: Hummingbird 42",
            "REQUEST: Complaint",
            "DATE: 2021-10-10",
        ],
        reject: &[],
        check_gps: false,
    },
    Case {
        name: "swap_mail_and_email",
        prompt: "Hello world, this is a great product so I'd like to order the Hummingbird 42. I am Jan from Berlin,
I'd like to be this shipped by 12th of August 2026 and you can send it to jan@foo.com. My mail address is
Mollstrasse 1 in 10117.",
        expect: &[
            "MAIL: jan@foo.com",
            "PRODUCT: Hummingbird 42",
            "REQUEST: Order",
            "ADDRESS: Mollstrasse 1",
            "ZIP: 10117",
            "LOCATION: Berlin",
            "COUNTRY: DE",
        ],
        reject: &[],
        check_gps: false,
    },
];

pub fn find_case(name: &str) -> Option<&'static Case> {
    CASES.iter().find(|c| c.name == name)
}

// ─────────────────────────────────────────────
// Checking replies
// ─────────────────────────────────────────────

/// Compiled patterns for the GPS check.
pub struct Checker {
    gps_line: Regex,
    gps_value: Regex,
}

impl Checker {
    pub fn new() -> Result<Self> {
        Ok(Self {
            gps_line: Regex::new(r"(?i)GPS:.*").map_err(|e| anyhow!("Invalid regex: {}", e))?,
            gps_value: Regex::new(r"^GPS:\s*(-?\d+\.\d+),(-?\d+\.\d+)")
                .map_err(|e| anyhow!("Invalid regex: {}", e))?,
        })
    }

    /// True when `line` starts with `GPS: lat,lon` and the point lies
    /// roughly around Berlin (lat 51..=53, lon 12..=14).
    pub fn validate_gps(&self, line: &str) -> bool {
        let Some(caps) = self.gps_value.captures(line) else {
            return false;
        };
        let (Ok(lat), Ok(lon)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) else {
            return false;
        };
        (51.0..=53.0).contains(&lat) && (12.0..=14.0).contains(&lon)
    }

    /// Every reason `reply` fails `case`; empty means pass.
    pub fn failures(&self, case: &Case, reply: &str) -> Vec<String> {
        let mut out: Vec<String> = case
            .expect
            .iter()
            .filter(|needle| !reply.contains(*needle))
            .map(|needle| format!("missing \"{needle}\""))
            .collect();

        out.extend(
            case.reject
                .iter()
                .filter(|needle| reply.contains(*needle))
                .map(|needle| format!("unexpected \"{needle}\"")),
        );

        if case.check_gps {
            match self.gps_line.find(reply) {
                Some(m) if self.validate_gps(m.as_str()) => {}
                Some(m) => out.push(format!("GPS out of range: \"{}\"", m.as_str().trim())),
                None => out.push("GPS value not found".to_string()),
            }
        }
        out
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
