use indexmap::IndexMap;

use crate::validation::ValidationError;

/// Ready-made prompt the user can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
}

const TEMPLATES: &[PromptTemplate] = &[
    PromptTemplate {
        slug: "creative-writing",
        title: "Creative Writing",
        description: "Write a short story in a specific style.",
        prompt: "Write a short story in the style of Edgar Allan Poe about a haunted lighthouse. The story should be around 500 words and focus on the lighthouse keeper's descent into madness as he witnesses strange, spectral lights over the sea.",
    },
    PromptTemplate {
        slug: "coding-assistance",
        title: "Coding Assistance",
        description: "Generate a Python function for a common task.",
        prompt: "Write a Python function that takes a list of URLs and returns a list of their HTTP status codes. The function should use the 'asyncio' and 'aiohttp' libraries to perform the requests concurrently for better performance. Include error handling for invalid URLs or network issues.",
    },
    PromptTemplate {
        slug: "data-analysis",
        title: "Data Analysis",
        description: "Get insights from a sample dataset.",
        prompt: "I have a CSV dataset of customer purchase history with the following columns: 'CustomerID', 'ProductName', 'PurchaseDate', 'Price', 'Category'. \nYour task is to act as a data analyst. Based on this structure, provide a list of 3 insightful questions that can be answered from this data. For each question, describe the analysis that would be needed.",
    },
    PromptTemplate {
        slug: "marketing-copy",
        title: "Marketing Copy",
        description: "Draft a promotional email for a new product.",
        prompt: "Draft a promotional email for a new product launch. The product is a smart coffee mug called 'EmberFlow' that keeps your drink at the perfect temperature for hours. The target audience is tech-savvy professionals and coffee lovers. The email should have a catchy subject line, a brief introduction, highlight 3 key features, and include a clear call-to-action with a limited-time 15% discount code 'LAUNCH15'.",
    },
    PromptTemplate {
        slug: "educational-explanation",
        title: "Educational Explanation",
        description: "Simplify a complex topic for an audience.",
        prompt: "Explain the concept of blockchain technology to a high school student. Use an analogy to make it easier to understand. Cover the key components like blocks, chains, decentralization, and cryptography. The explanation should be no more than 300 words.",
    },
    PromptTemplate {
        slug: "technical-architecture",
        title: "Technical Architecture",
        description: "Design a REST API for a web service.",
        prompt: "Act as a senior software architect. Design a REST API for a URL shortening service.\n\nThe API should include the following functionalities:\n1.  Create a new short URL for a given long URL.\n2.  Retrieve the original long URL from a short URL code.\n3.  Get basic analytics for a short URL (e.g., click count).\n\nDefine the following:\n-   API Endpoints (e.g., POST /api/v1/urls)\n-   Request/Response JSON data models for each endpoint.\n-   HTTP status codes for success and error cases.\n-   Suggested technology stack (e.g., Node.js, Express, Redis for caching, PostgreSQL for storage).",
    },
    PromptTemplate {
        slug: "executive-strategy",
        title: "Executive Strategy",
        description: "Draft a CEO's address for an upcoming board meeting.",
        prompt: "Act as the CEO of a mid-sized SaaS company, 'InnovateSphere', that just completed Q3.\n\nDraft a concise and impactful opening statement for the upcoming Board of Directors meeting.\n\nThe statement should:\n1.  Acknowledge the challenging market conditions this quarter.\n2.  Highlight two major wins: exceeding user acquisition targets by 15% and successfully launching a new enterprise feature.\n3.  Briefly touch upon the primary challenge: a 5% dip in customer retention.\n4.  Set a confident and forward-looking tone, outlining the key strategic priority for Q4, which is to launch a new customer success initiative to address retention.\n5.  The entire statement should be under 250 words.",
    },
    PromptTemplate {
        slug: "image-alt-text",
        title: "Image Alt Text",
        description: "Generate descriptive alt text for accessibility.",
        prompt: "Act as an SEO and accessibility expert. Your task is to generate concise and descriptive alt text for an image. The alt text should be under 125 characters. Do not include phrases like \"An image of\" or \"A picture of\". Based on the following context, generate the alt text: [Describe the image here, e.g., \"A golden retriever puppy playing in a field of yellow flowers during a sunny day.\"]",
    },
];

#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: IndexMap<&'static str, PromptTemplate>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self {
            templates: TEMPLATES
                .iter()
                .map(|template| (template.slug, *template))
                .collect(),
        }
    }

    pub fn list(&self) -> impl Iterator<Item = &PromptTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Looks up by slug, 1-based position, or case-insensitive title.
    pub fn find(&self, query: &str) -> Result<&PromptTemplate, ValidationError> {
        let needle = query.trim();
        if let Some(template) = self.templates.get(needle.to_ascii_lowercase().as_str()) {
            return Ok(template);
        }
        if let Some((_, template)) = needle
            .parse::<usize>()
            .ok()
            .and_then(|position| position.checked_sub(1))
            .and_then(|index| self.templates.get_index(index))
        {
            return Ok(template);
        }
        self.templates
            .values()
            .find(|template| template.title.eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownTemplate(needle.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::TemplateCatalog;

    #[test]
    fn catalog_keeps_declaration_order() {
        let catalog = TemplateCatalog::new();
        let titles: Vec<&str> = catalog.list().map(|template| template.title).collect();
        assert_eq!(catalog.len(), 8);
        assert_eq!(titles.first().copied(), Some("Creative Writing"));
        assert_eq!(titles.last().copied(), Some("Image Alt Text"));
    }

    #[test]
    fn find_accepts_slug_title_and_position() {
        let catalog = TemplateCatalog::new();
        let by_slug = catalog.find("data-analysis").map(|t| t.title);
        let by_title = catalog.find("marketing copy").map(|t| t.slug);
        let by_index = catalog.find("2").map(|t| t.slug);
        assert_eq!(by_slug.ok(), Some("Data Analysis"));
        assert_eq!(by_title.ok(), Some("marketing-copy"));
        assert_eq!(by_index.ok(), Some("coding-assistance"));
    }

    #[test]
    fn find_reports_unknown_queries() {
        let catalog = TemplateCatalog::new();
        let err = catalog.find("haiku").err().map(|err| err.to_string());
        assert_eq!(err.as_deref(), Some("No prompt template matches 'haiku'."));
        assert!(catalog.find("0").is_err());
        assert!(catalog.find("9").is_err());
    }
}
