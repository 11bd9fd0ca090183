use super::BRIDGE_UUID;

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }

    escaped
}

/// UPnP device description served at `/description.xml`
pub fn description(friendly_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <specVersion>
    <major>1</major>
    <minor>0</minor>
  </specVersion>
  <device>
    <deviceType>urn:schemas-upnp-org:device:Basic:1</deviceType>
    <friendlyName>{name}</friendlyName>
    <manufacturer>Royal Philips Electronics</manufacturer>
    <manufacturerURL>http://www.philips.com</manufacturerURL>
    <modelDescription>Philips hue Personal Wireless Lighting</modelDescription>
    <modelName>Philips hue bridge 2012</modelName>
    <modelNumber>929000226503</modelNumber>
    <modelURL>http://www.meethue.com</modelURL>
    <serialNumber>0017880ae670</serialNumber>
    <UDN>uuid:{uuid}</UDN>
  </device>
</root>
"#,
        name = escape(friendly_name),
        uuid = BRIDGE_UUID,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_fields() {
        let xml = description("Fake Hue Bridge");

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<friendlyName>Fake Hue Bridge</friendlyName>"));
        assert!(xml.contains("<modelName>Philips hue bridge 2012</modelName>"));
        assert!(xml.contains("<UDN>uuid:2f402f80-da50-11e1-9b23-001788102201</UDN>"));
    }

    #[test]
    fn description_escapes_name() {
        let xml = description("Hall & <Kitchen>");
        assert!(xml.contains("<friendlyName>Hall &amp; &lt;Kitchen&gt;</friendlyName>"));
    }
}
