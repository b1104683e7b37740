//! Device classification from raw User-Agent strings
//!
//! Maps a User-Agent to one of four device classes using woothee, with
//! tablet detection layered on top (woothee has no tablet category: iPads
//! and Android tablets both come back as "smartphone").
//!
//! `classify` is total: unparseable or empty strings classify as `Other`.

use woothee::parser::Parser;

/// 设备类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Mobile,
    Tablet,
    Other,
}

/// Classify a single User-Agent string
pub fn classify(user_agent: &str) -> DeviceClass {
    let parser = Parser::new();
    classify_with(&parser, user_agent)
}

/// Classify with a caller-provided parser (reused across a batch)
pub fn classify_with(parser: &Parser, user_agent: &str) -> DeviceClass {
    match parser.parse(user_agent) {
        Some(result) => match result.category {
            "pc" => DeviceClass::Desktop,
            "smartphone" | "mobilephone" => {
                if is_tablet(user_agent, result.os) {
                    DeviceClass::Tablet
                } else {
                    DeviceClass::Mobile
                }
            }
            // crawler / appliance / misc / unknown
            _ => DeviceClass::Other,
        },
        None => DeviceClass::Other,
    }
}

/// woothee 把平板归入 smartphone，这里再细分：
/// iPad、带 Tablet 标记、或不带 Mobile 标记的 Android 视为平板
fn is_tablet(user_agent: &str, os: &str) -> bool {
    os == "iPad"
        || user_agent.contains("iPad")
        || user_agent.contains("Tablet")
        || (user_agent.contains("Android") && !user_agent.contains("Mobile"))
}

/// Device counters for one batch of interactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceCounts {
    pub desktop: i32,
    pub mobile: i32,
    pub tablet: i32,
    pub other: i32,
}

impl DeviceCounts {
    pub fn add(&mut self, class: DeviceClass) {
        match class {
            DeviceClass::Desktop => self.desktop += 1,
            DeviceClass::Mobile => self.mobile += 1,
            DeviceClass::Tablet => self.tablet += 1,
            DeviceClass::Other => self.other += 1,
        }
    }

    pub fn total(&self) -> i64 {
        self.desktop as i64 + self.mobile as i64 + self.tablet as i64 + self.other as i64
    }
}

/// Count device classes over a batch of User-Agent strings
///
/// Every input increments exactly one counter, so the counter sum always
/// equals the input length.
pub fn count_devices<'a, I>(user_agents: I) -> DeviceCounts
where
    I: IntoIterator<Item = &'a str>,
{
    let parser = Parser::new();
    let mut counts = DeviceCounts::default();
    for ua in user_agents {
        counts.add(classify_with(&parser, ua));
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    const UA_CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const UA_SAFARI_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15";
    const UA_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const UA_IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";
    const UA_ANDROID_PHONE: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
    const UA_ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X906C) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const UA_GOOGLEBOT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

    #[test]
    fn test_classify_desktop() {
        assert_eq!(classify(UA_CHROME_WINDOWS), DeviceClass::Desktop);
        assert_eq!(classify(UA_SAFARI_MAC), DeviceClass::Desktop);
    }

    #[test]
    fn test_classify_mobile() {
        assert_eq!(classify(UA_IPHONE), DeviceClass::Mobile);
        assert_eq!(classify(UA_ANDROID_PHONE), DeviceClass::Mobile);
    }

    #[test]
    fn test_classify_tablet() {
        assert_eq!(classify(UA_IPAD), DeviceClass::Tablet);
        assert_eq!(classify(UA_ANDROID_TABLET), DeviceClass::Tablet);
    }

    #[test]
    fn test_classify_crawler_as_other() {
        assert_eq!(classify(UA_GOOGLEBOT), DeviceClass::Other);
    }

    #[test]
    fn test_classify_garbage_as_other() {
        assert_eq!(classify(""), DeviceClass::Other);
        assert_eq!(classify("definitely not a user agent"), DeviceClass::Other);
    }

    #[test]
    fn test_count_devices_totals() {
        let uas = [
            UA_CHROME_WINDOWS,
            UA_SAFARI_MAC,
            UA_IPHONE,
            UA_IPAD,
            UA_ANDROID_TABLET,
            UA_GOOGLEBOT,
            "",
        ];
        let counts = count_devices(uas);

        assert_eq!(counts.desktop, 2);
        assert_eq!(counts.mobile, 1);
        assert_eq!(counts.tablet, 2);
        assert_eq!(counts.other, 2);
        // 每个输入恰好落入一个计数器
        assert_eq!(counts.total(), uas.len() as i64);
    }

    #[test]
    fn test_count_devices_empty() {
        let counts = count_devices(std::iter::empty());
        assert_eq!(counts, DeviceCounts::default());
        assert_eq!(counts.total(), 0);
    }
}
