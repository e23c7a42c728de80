use maud::{html, Markup};

use crate::{
    format_date,
    templates::layouts::{base, PageConfig},
    DatasetBounds,
};

pub fn home_page(api_base: &str, bounds: &DatasetBounds) -> Markup {
    let config = PageConfig {
        title: "Hawaii Climate API",
        api_base,
    };

    base(&config, content(api_base, bounds))
}

fn content(api_base: &str, bounds: &DatasetBounds) -> Markup {
    let earliest = format_date(bounds.earliest());
    let latest = format_date(bounds.latest());
    let cutoff = format_date(bounds.one_year_cutoff());

    html! {
        div class="content" {
            p {
                "Observations are available from "
                strong { (earliest) } " to " strong { (latest) } "."
            }
            h3 { "Available Routes and Usage Instructions" }
            ul {
                li {
                    strong { (route(api_base, "/api/v1.0/precipitation")) }
                    " - Dates and precipitation (inches) from " (cutoff) " to " (latest)
                    ", grouped by date."
                }
                li {
                    strong { (route(api_base, "/api/v1.0/stations")) }
                    " - List of stations."
                }
                li {
                    strong { (route(api_base, "/api/v1.0/tobs")) }
                    " - Dates and temperature (F) from " (cutoff) " to " (latest)
                    " for the most active station."
                }
                li {
                    strong { (route(api_base, "/api/v1.0/")) code { "<start>" } }
                    " - Minimum, average, and maximum temperature (F) for all dates on or after the start date. "
                    em { "The date must fall between " (earliest) " and " (latest) ", e.g. " (latest) "." }
                }
                li {
                    strong { (route(api_base, "/api/v1.0/")) code { "<start>/<end>" } }
                    " - Minimum, average, and maximum temperature (F) between the start and end date (inclusive). "
                    em { "Dates such as " (cutoff) " or \"Aug 23, 2017\" are accepted." }
                }
            }
        }
    }
}

fn route(api_base: &str, path: &str) -> String {
    format!("{}{}", api_base.trim_end_matches('/'), path)
}
