use crate::types::LocationQuery;

/// Phrase naming the location inside the instruction
fn location_phrase(query: &LocationQuery) -> String {
    match query {
        LocationQuery::Coordinates {
            latitude,
            longitude,
        } => format!("at latitude {latitude} and longitude {longitude}"),
        LocationQuery::City(city) => format!("for the city \"{}\"", city.trim()),
    }
}

/// Build the instruction sent to the generative backend.
pub fn build_prompt(query: &LocationQuery) -> String {
    format!(
        r#"Based on a Google Search for the current weather {location}, provide the following information as a single, valid JSON object and nothing else.
Do not add any explanation, and do not wrap the JSON in code fences or markdown.
If you cannot find the weather for the location, reply only with a JSON object carrying an error message, for example: {{"error": "Location not found"}}.
The successful JSON object must have exactly these keys and value types:
- "city": string (e.g., "Mountain View")
- "temperature": number (in Celsius)
- "condition": string (e.g., "Clear", "Partly Cloudy", "Rain")
- "humidity": number (percentage, e.g., 65)
- "windSpeed": number (in km/h)
- "icon": string (a single emoji representing the weather, e.g., "☀️", "☁️", "🌧️")"#,
        location = location_phrase(query)
    )
}
