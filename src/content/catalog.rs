//! Default FAQ catalog
//!
//! The terminal fallback for page FAQs: a fixed set of question templates
//! per page type and locale, rendered with handlebars. Total by
//! construction: every (page type, locale) pair has at least two entries,
//! and a template that fails to render is emitted as raw text rather than
//! dropped.

use handlebars::Handlebars;
use serde_json::json;
use tracing::warn;

use super::Faq;
use crate::models::{Locale, PageType, Place};

type Template = (&'static str, &'static str);

/// Inputs that key the default FAQ set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FaqRequest {
    pub page_type: PageType,
    pub locale: Locale,
    pub place_name: String,
    pub category_name: Option<String>,
    pub city_name: String,
    pub country_name: String,
}

impl FaqRequest {
    pub fn for_place(place: &Place, locale: Locale) -> Self {
        Self {
            page_type: PageType::Place,
            locale,
            place_name: place.name.clone(),
            category_name: place.primary_category().map(|c| c.name.clone()),
            city_name: place.city.name.clone(),
            country_name: place.city.country.name.clone(),
        }
    }
}

pub struct DefaultFaqCatalog {
    handlebars: Handlebars<'static>,
}

impl Default for DefaultFaqCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultFaqCatalog {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // Plain text output; escaping belongs to whatever renders the page
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Default FAQs for a page. Never empty, never a single entry.
    pub fn defaults(&self, request: &FaqRequest) -> Vec<Faq> {
        let data = json!({
            "placeName": request.place_name,
            "categoryName": request
                .category_name
                .as_deref()
                .unwrap_or_else(|| generic_category(request.locale)),
            "cityName": request.city_name,
            "countryName": request.country_name,
        });

        templates(request.page_type, request.locale)
            .iter()
            .map(|(question, answer)| Faq {
                question: self.render(question, &data),
                answer: self.render(answer, &data),
            })
            .collect()
    }

    fn render(&self, template: &str, data: &serde_json::Value) -> String {
        self.handlebars
            .render_template(template, data)
            .unwrap_or_else(|e| {
                warn!(error = %e, template, "FAQ template failed to render, using raw text");
                template.to_string()
            })
    }
}

fn generic_category(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "business",
        Locale::Nl => "bedrijf",
        Locale::De => "Unternehmen",
        Locale::Fr => "établissement",
    }
}

fn templates(page_type: PageType, locale: Locale) -> &'static [Template] {
    match (page_type, locale) {
        (PageType::Place, Locale::En) => PLACE_EN,
        (PageType::Place, Locale::Nl) => PLACE_NL,
        (PageType::Place, Locale::De) => PLACE_DE,
        (PageType::Place, Locale::Fr) => PLACE_FR,
        (PageType::City, Locale::En) => CITY_EN,
        (PageType::City, Locale::Nl) => CITY_NL,
        (PageType::City, Locale::De) => CITY_DE,
        (PageType::City, Locale::Fr) => CITY_FR,
        (PageType::Category, Locale::En) => CATEGORY_EN,
        (PageType::Category, Locale::Nl) => CATEGORY_NL,
        (PageType::Category, Locale::De) => CATEGORY_DE,
        (PageType::Category, Locale::Fr) => CATEGORY_FR,
    }
}

// ── Place pages ────────────────────────────────────────────────

const PLACE_EN: &[Template] = &[
    (
        "Where is {{placeName}} located?",
        "{{placeName}} is located in {{cityName}}, {{countryName}}. The address and map on this page show how to get there.",
    ),
    (
        "What does {{placeName}} offer?",
        "{{placeName}} is listed as a {{categoryName}} in {{cityName}}. The description and highlights on this page give an overview of what to expect.",
    ),
    (
        "How can I contact {{placeName}}?",
        "Use the contact details shown on this page. If no phone number or website is listed, the business has not published one here yet.",
    ),
    (
        "What do visitors say about {{placeName}}?",
        "Read the reviews on this page to see what other visitors in {{cityName}} think of {{placeName}}.",
    ),
];

const PLACE_NL: &[Template] = &[
    (
        "Waar is {{placeName}} gevestigd?",
        "{{placeName}} is gevestigd in {{cityName}}, {{countryName}}. Het adres en de kaart op deze pagina laten zien hoe u er komt.",
    ),
    (
        "Wat biedt {{placeName}}?",
        "{{placeName}} staat vermeld als {{categoryName}} in {{cityName}}. De beschrijving en hoogtepunten op deze pagina geven een overzicht van wat u kunt verwachten.",
    ),
    (
        "Hoe neem ik contact op met {{placeName}}?",
        "Gebruik de contactgegevens op deze pagina. Staat er geen telefoonnummer of website vermeld, dan heeft het bedrijf die hier nog niet gepubliceerd.",
    ),
    (
        "Wat vinden bezoekers van {{placeName}}?",
        "Lees de beoordelingen op deze pagina om te zien wat andere bezoekers in {{cityName}} van {{placeName}} vinden.",
    ),
];

const PLACE_DE: &[Template] = &[
    (
        "Wo befindet sich {{placeName}}?",
        "{{placeName}} befindet sich in {{cityName}}, {{countryName}}. Adresse und Karte auf dieser Seite zeigen den Weg.",
    ),
    (
        "Was bietet {{placeName}} an?",
        "{{placeName}} ist als {{categoryName}} in {{cityName}} eingetragen. Beschreibung und Highlights auf dieser Seite geben einen Überblick.",
    ),
    (
        "Wie kann ich {{placeName}} kontaktieren?",
        "Nutzen Sie die Kontaktdaten auf dieser Seite. Fehlen Telefonnummer oder Website, hat das Unternehmen sie hier noch nicht veröffentlicht.",
    ),
    (
        "Was sagen Besucher über {{placeName}}?",
        "Lesen Sie die Bewertungen auf dieser Seite, um zu erfahren, was andere Besucher in {{cityName}} über {{placeName}} denken.",
    ),
];

const PLACE_FR: &[Template] = &[
    (
        "Où se trouve {{placeName}} ?",
        "{{placeName}} se trouve à {{cityName}}, {{countryName}}. L'adresse et la carte sur cette page indiquent comment s'y rendre.",
    ),
    (
        "Que propose {{placeName}} ?",
        "{{placeName}} est référencé dans la catégorie {{categoryName}} à {{cityName}}. La description et les points forts de cette page donnent un aperçu de ce qui vous attend.",
    ),
    (
        "Comment contacter {{placeName}} ?",
        "Utilisez les coordonnées affichées sur cette page. Si aucun numéro ni site web n'est indiqué, l'établissement ne l'a pas encore publié ici.",
    ),
    (
        "Que pensent les visiteurs de {{placeName}} ?",
        "Consultez les avis sur cette page pour savoir ce que les autres visiteurs de {{cityName}} pensent de {{placeName}}.",
    ),
];

// ── City pages ─────────────────────────────────────────────────

const CITY_EN: &[Template] = &[
    (
        "What kinds of places are listed in {{cityName}}?",
        "The directory lists local businesses in {{cityName}}, {{countryName}} across many categories. Pick a category on this page to narrow your search.",
    ),
    (
        "How are places in {{cityName}} ordered?",
        "Places are ordered by their average rating and the number of reviews left by visitors.",
    ),
    (
        "Can I add my business in {{cityName}}?",
        "Yes. Owners can add or claim a listing for free and upgrade later for more visibility.",
    ),
];

const CITY_NL: &[Template] = &[
    (
        "Welke plekken staan er in {{cityName}}?",
        "De gids bevat lokale bedrijven in {{cityName}}, {{countryName}} in allerlei categorieën. Kies een categorie op deze pagina om gericht te zoeken.",
    ),
    (
        "Hoe worden plekken in {{cityName}} gesorteerd?",
        "Plekken worden gesorteerd op gemiddelde beoordeling en het aantal beoordelingen van bezoekers.",
    ),
    (
        "Kan ik mijn bedrijf in {{cityName}} toevoegen?",
        "Ja. Eigenaren kunnen gratis een vermelding toevoegen of claimen en later upgraden voor meer zichtbaarheid.",
    ),
];

const CITY_DE: &[Template] = &[
    (
        "Welche Orte sind in {{cityName}} eingetragen?",
        "Das Verzeichnis enthält lokale Unternehmen in {{cityName}}, {{countryName}} aus vielen Kategorien. Wählen Sie auf dieser Seite eine Kategorie, um die Suche einzugrenzen.",
    ),
    (
        "Wie werden Orte in {{cityName}} sortiert?",
        "Orte werden nach ihrer Durchschnittsbewertung und der Anzahl der Bewertungen sortiert.",
    ),
    (
        "Kann ich mein Unternehmen in {{cityName}} eintragen?",
        "Ja. Inhaber können einen Eintrag kostenlos hinzufügen oder beanspruchen und später für mehr Sichtbarkeit upgraden.",
    ),
];

const CITY_FR: &[Template] = &[
    (
        "Quels lieux sont référencés à {{cityName}} ?",
        "L'annuaire référence des établissements locaux à {{cityName}}, {{countryName}} dans de nombreuses catégories. Choisissez une catégorie sur cette page pour affiner votre recherche.",
    ),
    (
        "Comment les lieux de {{cityName}} sont-ils classés ?",
        "Les lieux sont classés selon leur note moyenne et le nombre d'avis laissés par les visiteurs.",
    ),
    (
        "Puis-je ajouter mon établissement à {{cityName}} ?",
        "Oui. Les propriétaires peuvent ajouter ou revendiquer une fiche gratuitement, puis passer à une offre supérieure pour plus de visibilité.",
    ),
];

// ── Category pages ─────────────────────────────────────────────

const CATEGORY_EN: &[Template] = &[
    (
        "How do I choose a {{categoryName}} in {{cityName}}?",
        "Compare ratings, reviews and the services listed on each page to find the {{categoryName}} in {{cityName}} that suits you.",
    ),
    (
        "Are {{categoryName}} listings in {{cityName}} kept up to date?",
        "Listings are refreshed regularly from owner updates and public sources. Owners can claim their listing to keep it current.",
    ),
    (
        "Can I review a {{categoryName}} in {{cityName}}?",
        "Yes. Open the page of the place you visited and share your experience to help others.",
    ),
];

const CATEGORY_NL: &[Template] = &[
    (
        "Hoe kies ik een {{categoryName}} in {{cityName}}?",
        "Vergelijk beoordelingen, ervaringen en de diensten op elke pagina om de {{categoryName}} in {{cityName}} te vinden die bij u past.",
    ),
    (
        "Zijn de vermeldingen voor {{categoryName}} in {{cityName}} actueel?",
        "Vermeldingen worden regelmatig bijgewerkt via eigenaren en openbare bronnen. Eigenaren kunnen hun vermelding claimen om die actueel te houden.",
    ),
    (
        "Kan ik een {{categoryName}} in {{cityName}} beoordelen?",
        "Ja. Open de pagina van de plek die u bezocht en deel uw ervaring om anderen te helpen.",
    ),
];

const CATEGORY_DE: &[Template] = &[
    (
        "Wie finde ich passende Einträge für {{categoryName}} in {{cityName}}?",
        "Vergleichen Sie Bewertungen, Erfahrungen und die angebotenen Leistungen auf jeder Seite, um in {{cityName}} das Passende zu finden.",
    ),
    (
        "Sind die Einträge für {{categoryName}} in {{cityName}} aktuell?",
        "Einträge werden regelmäßig anhand von Inhaberangaben und öffentlichen Quellen aktualisiert. Inhaber können ihren Eintrag beanspruchen, um ihn aktuell zu halten.",
    ),
    (
        "Kann ich Einträge für {{categoryName}} in {{cityName}} bewerten?",
        "Ja. Öffnen Sie die Seite des besuchten Ortes und teilen Sie Ihre Erfahrung, um anderen zu helfen.",
    ),
];

const CATEGORY_FR: &[Template] = &[
    (
        "Comment choisir dans la catégorie {{categoryName}} à {{cityName}} ?",
        "Comparez les notes, les avis et les services indiqués sur chaque page pour trouver ce qui vous convient à {{cityName}}.",
    ),
    (
        "Les fiches {{categoryName}} à {{cityName}} sont-elles à jour ?",
        "Les fiches sont actualisées régulièrement à partir des propriétaires et de sources publiques. Les propriétaires peuvent revendiquer leur fiche pour la tenir à jour.",
    ),
    (
        "Puis-je laisser un avis dans la catégorie {{categoryName}} à {{cityName}} ?",
        "Oui. Ouvrez la page du lieu visité et partagez votre expérience pour aider les autres.",
    ),
];
