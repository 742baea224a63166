use std::fmt;
use std::time::Duration;

/// The two site variants that carry a lead form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteId {
    Portfolio,
    ClientSite,
}

impl SiteId {
    pub const ALL: [SiteId; 2] = [SiteId::Portfolio, SiteId::ClientSite];

    pub fn slug(&self) -> &'static str {
        match self {
            SiteId::Portfolio => "portfolio",
            SiteId::ClientSite => "client-site",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|site| site.slug() == slug)
    }

    pub fn profile(&self) -> &'static SiteProfile {
        match self {
            SiteId::Portfolio => &PORTFOLIO,
            SiteId::ClientSite => &CLIENT_SITE,
        }
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Trimmed length in UTF-16 code units must reach the minimum.
    MinLength(usize),
    Email,
    /// Selection fields: any non-empty value.
    Required,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
    pub message: &'static str,
}

/// Where the numeric `value` of the generic analytics event comes from.
#[derive(Debug, Clone, Copy)]
pub enum ConversionValue {
    /// Passed through as-is from a submitted field.
    Field(&'static str),
    /// Looked up in the lead value table keyed by a company size field.
    LeadValue(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct Conversion {
    pub event_name: &'static str,
    pub category: &'static str,
    pub label_field: &'static str,
    pub value: ConversionValue,
    pub pixel_event: &'static str,
    pub pixel_content_name: Option<&'static str>,
    pub insight_conversion_id: Option<u64>,
}

/// Scheduling widget booking notifications.
#[derive(Debug, Clone, Copy)]
pub struct Booking {
    pub origin: &'static str,
    pub scheduled_event: &'static str,
    pub analytics_event: &'static str,
    pub analytics_source: &'static str,
    pub webhook_type: &'static str,
    pub webhook_source: &'static str,
}

/// Engagement event emitted for call-to-action clicks.
#[derive(Debug, Clone, Copy)]
pub struct Engagement {
    pub event_name: &'static str,
    pub category: &'static str,
}

#[derive(Debug)]
pub struct SiteProfile {
    pub id: SiteId,
    /// Schema fields in declaration order.
    pub fields: &'static [&'static str],
    pub rules: &'static [FieldRule],
    pub source: &'static str,
    pub page: Option<&'static str>,
    /// Attach `userAgent` and `referrer` to every submission.
    pub include_client_context: bool,
    pub submit_label: &'static str,
    pub busy_label: &'static str,
    pub success_text: &'static str,
    pub error_text: &'static str,
    pub success_dismiss: Option<Duration>,
    pub error_dismiss: Option<Duration>,
    pub scroll_into_view: bool,
    pub conversion: Conversion,
    pub booking: Option<Booking>,
    pub engagement: Option<Engagement>,
}

pub static PORTFOLIO: SiteProfile = SiteProfile {
    id: SiteId::Portfolio,
    fields: &["name", "email", "projectType", "budget", "message"],
    rules: &[
        FieldRule {
            field: "name",
            rule: Rule::MinLength(2),
            message: "Please enter a valid name",
        },
        FieldRule {
            field: "email",
            rule: Rule::Email,
            message: "Please enter a valid email address",
        },
        FieldRule {
            field: "projectType",
            rule: Rule::Required,
            message: "Please select a project type",
        },
        FieldRule {
            field: "message",
            rule: Rule::MinLength(10),
            message: "Please provide more details about your project (min 10 characters)",
        },
    ],
    source: "Portfolio Contact Form",
    page: None,
    include_client_context: false,
    submit_label: "Send Message",
    busy_label: "Sending...",
    success_text: "✓ Message sent! I'll respond within 24 hours.",
    error_text: "× Something went wrong. Please try emailing directly.",
    success_dismiss: Some(Duration::from_secs(5)),
    error_dismiss: Some(Duration::from_secs(5)),
    scroll_into_view: false,
    conversion: Conversion {
        event_name: "portfolio_contact",
        category: "Contact",
        label_field: "projectType",
        value: ConversionValue::Field("budget"),
        pixel_event: "Contact",
        pixel_content_name: None,
        insight_conversion_id: None,
    },
    booking: Some(Booking {
        origin: "https://calendly.com",
        scheduled_event: "calendly.event_scheduled",
        analytics_event: "calendly_booking",
        analytics_source: "Portfolio Calendly Widget",
        webhook_type: "calendly_booking",
        webhook_source: "Portfolio Page",
    }),
    engagement: None,
};

pub static CLIENT_SITE: SiteProfile = SiteProfile {
    id: SiteId::ClientSite,
    fields: &[
        "fullName",
        "email",
        "company",
        "industry",
        "companySize",
        "challenge",
    ],
    rules: &[
        FieldRule {
            field: "fullName",
            rule: Rule::MinLength(2),
            message: "Please enter your full name",
        },
        FieldRule {
            field: "email",
            rule: Rule::Email,
            message: "Please enter a valid work email address",
        },
        FieldRule {
            field: "company",
            rule: Rule::MinLength(2),
            message: "Please enter your company name",
        },
        FieldRule {
            field: "industry",
            rule: Rule::Required,
            message: "Please select your industry",
        },
        FieldRule {
            field: "companySize",
            rule: Rule::Required,
            message: "Please select your company size",
        },
        FieldRule {
            field: "challenge",
            rule: Rule::MinLength(20),
            message: "Please describe your AI challenge in more detail (min 20 characters)",
        },
    ],
    source: "VelocityAI Website",
    page: Some("Client Site Demo"),
    include_client_context: true,
    submit_label: "Get My Free AI Audit",
    busy_label: "Submitting...",
    success_text: "✓ Success! We'll review your request and contact you within 24 hours to schedule your free AI audit.",
    error_text: "× We encountered an issue. Please email us directly at hello@velocityai.com or try again.",
    success_dismiss: Some(Duration::from_secs(10)),
    error_dismiss: None,
    scroll_into_view: true,
    conversion: Conversion {
        event_name: "lead_submission",
        category: "Lead Generation",
        label_field: "industry",
        value: ConversionValue::LeadValue("companySize"),
        pixel_event: "Lead",
        pixel_content_name: Some("AI Audit Request"),
        insight_conversion_id: Some(12345678),
    },
    booking: None,
    engagement: Some(Engagement {
        event_name: "cta_click",
        category: "Engagement",
    }),
};
