use crate::loader::LoadState;
use crate::nav::nav_links;
use crate::page::Page;
use crate::profile::{Profile, SocialLink};
use crate::utils::{escape_attr, escape_text, indent};

/// Message shown when the profile could not be loaded
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load profile data.";

/// Site label for the title, brand and copyright. The display name itself
/// is only ever written by the hero greeting.
const SITE_LABEL: &str = "Portfolio";

/// A self-contained block of the page, gated on data presence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Nav,
    Hero,
    About,
    Education,
    Skills,
    Interests,
    Arsenal,
    Projects,
    Contact,
    Footer,
}

impl Section {
    pub fn name(&self) -> &'static str {
        match self {
            Section::Nav => "nav",
            Section::Hero => "hero",
            Section::About => "about",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Interests => "interests",
            Section::Arsenal => "arsenal",
            Section::Projects => "projects",
            Section::Contact => "contact",
            Section::Footer => "footer",
        }
    }
}

/// Sections that render for this profile, in page order.
///
/// An empty or absent list drops its section entirely.
pub fn sections(profile: &Profile) -> Vec<Section> {
    let mut sections = vec![Section::Nav, Section::Hero, Section::About];

    if !profile.education.is_empty() {
        sections.push(Section::Education);
    }
    if !profile.skills.is_empty() {
        sections.push(Section::Skills);
    }
    if !profile.interests.is_empty() {
        sections.push(Section::Interests);
    }
    if !profile.arsenal_groups().is_empty() {
        sections.push(Section::Arsenal);
    }
    if !profile.project_list().is_empty() {
        sections.push(Section::Projects);
    }

    sections.push(Section::Contact);
    sections.push(Section::Footer);
    sections
}

/// Render the whole page for its current state
pub fn render_page(page: &Page) -> String {
    match page.load_state() {
        LoadState::Loading => document("Loading", &render_loading()),
        LoadState::Failed => document(SITE_LABEL, &render_failed()),
        LoadState::Ready(profile) => document(SITE_LABEL, &render_profile(page, profile)),
    }
}

fn document(title: &str, body: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"en\">\n");
    html.push_str("<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    html.push_str(&format!("  <title>{}</title>\n", escape_text(title)));
    html.push_str("  <link rel=\"stylesheet\" href=\"styles.css\">\n");
    html.push_str("</head>\n");
    html.push_str("<body>\n");
    html.push_str(&indent(body, 2));
    html.push_str("</body>\n");
    html.push_str("</html>\n");
    html
}

fn render_loading() -> String {
    "<div class=\"loading\">\n  <div class=\"spinner\" role=\"status\" aria-label=\"Loading\"></div>\n</div>\n"
        .to_string()
}

fn render_failed() -> String {
    format!(
        "<div class=\"load-failed\">\n  <p>{}</p>\n</div>\n",
        LOAD_FAILED_MESSAGE
    )
}

fn render_profile(page: &Page, profile: &Profile) -> String {
    let mut body = String::new();
    let mut main = String::new();
    let mut education_rendered = false;

    for section in sections(profile) {
        match section {
            Section::Nav => body.push_str(&render_nav(page, profile)),
            Section::Hero => main.push_str(&render_hero(page, profile)),
            Section::About => main.push_str(&render_about(profile)),
            // Education, skills and interests share one section block
            Section::Education | Section::Skills | Section::Interests => {
                if !education_rendered {
                    main.push_str(&render_education(profile));
                    education_rendered = true;
                }
            }
            Section::Arsenal => main.push_str(&render_arsenal(profile)),
            Section::Projects => main.push_str(&render_projects(profile)),
            Section::Contact => main.push_str(&render_contact(profile)),
            // Rendered after <main>
            Section::Footer => {}
        }
    }

    body.push_str("<main>\n");
    body.push_str(&indent(&main, 2));
    body.push_str("</main>\n");
    body.push_str(&render_footer(page, profile));
    body.push_str(&render_scroll_to_top(page));
    body
}

fn render_nav(page: &Page, profile: &Profile) -> String {
    let menu_open = page.menu().is_open();
    let mut nav = String::new();

    nav.push_str("<nav class=\"navbar\">\n");
    nav.push_str(&format!("  <a href=\"#\" class=\"brand\">{}.</a>\n", SITE_LABEL));

    nav.push_str("  <div class=\"nav-links\">\n");
    for link in nav_links() {
        nav.push_str(&format!(
            "    <a href=\"{}\">{}</a>\n",
            link.href, link.label
        ));
    }
    nav.push_str(&format!(
        "    <a href=\"{}\" class=\"button button-primary\">Resume</a>\n",
        escape_attr(&profile.resume)
    ));
    nav.push_str("  </div>\n");

    nav.push_str(&format!(
        "  <button class=\"menu-toggle\" aria-expanded=\"{}\" aria-label=\"{}\"></button>\n",
        menu_open,
        if menu_open { "Close menu" } else { "Open menu" }
    ));

    // The mobile menu only exists in the markup while it is open
    if menu_open {
        nav.push_str("  <div class=\"mobile-nav\">\n");
        for link in nav_links() {
            nav.push_str(&format!(
                "    <a href=\"{}\" data-closes-menu>{}</a>\n",
                link.href, link.label
            ));
        }
        nav.push_str(&format!(
            "    <a href=\"{}\" class=\"button button-primary\">Resume</a>\n",
            escape_attr(&profile.resume)
        ));
        nav.push_str("  </div>\n");
    }

    nav.push_str("</nav>\n");
    nav
}

fn render_hero(page: &Page, profile: &Profile) -> String {
    let mut hero = String::new();
    hero.push_str("<section id=\"home\" class=\"hero\">\n");
    hero.push_str("  <div class=\"hero-text\">\n");
    hero.push_str("    <h2 class=\"eyebrow\">Welcome to my world</h2>\n");
    hero.push_str(&format!(
        "    <h1 class=\"greeting\">{}<span class=\"caret\"></span></h1>\n",
        escape_text(page.typewriter().displayed())
    ));
    hero.push_str(&format!(
        "    <p class=\"title\">{}.</p>\n",
        escape_text(&profile.title)
    ));
    hero.push_str("    <a href=\"#contact\" class=\"button button-primary\">Contact Me</a>\n");
    hero.push_str("  </div>\n");
    hero.push_str("  <div class=\"hero-image\">\n");
    hero.push_str(&format!(
        "    <img src=\"{}\" alt=\"Profile photo\" referrerpolicy=\"no-referrer\">\n",
        escape_attr(&profile.profile_image)
    ));
    hero.push_str("  </div>\n");
    hero.push_str("</section>\n");
    hero
}

fn render_about(profile: &Profile) -> String {
    let mut about = String::new();
    about.push_str("<section id=\"about\" class=\"about\">\n");
    about.push_str("  <h2>About Me</h2>\n");
    about.push_str(&format!(
        "  <p class=\"bio\">{}</p>\n",
        escape_text(&profile.bio)
    ));
    about.push_str("  <div class=\"card location\">\n");
    about.push_str("    <h3>Location</h3>\n");
    about.push_str(&format!("    <p>{}</p>\n", escape_text(&profile.address)));
    about.push_str("  </div>\n");

    let links = profile.social_links();
    if !links.is_empty() {
        about.push_str("  <div class=\"card socials\">\n");
        about.push_str("    <h3>Social Connect</h3>\n");
        for link in &links {
            about.push_str(&format!("    {}\n", social_anchor(link, true)));
        }
        about.push_str("  </div>\n");
    }

    about.push_str("</section>\n");
    about
}

/// Education timeline plus the skills and interests chips.
///
/// Returns an empty string when all three lists are empty.
pub(crate) fn render_education(profile: &Profile) -> String {
    if profile.education.is_empty() && profile.skills.is_empty() && profile.interests.is_empty()
    {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("<section id=\"education\" class=\"education\">\n");

    if !profile.education.is_empty() {
        section.push_str("  <div class=\"timeline\">\n");
        section.push_str("    <h2>Education</h2>\n");
        for edu in &profile.education {
            section.push_str("    <article class=\"timeline-entry\">\n");
            section.push_str(&format!(
                "      <span class=\"year\">{}</span>\n",
                escape_text(&edu.year)
            ));
            section.push_str(&format!("      <h3>{}</h3>\n", escape_text(&edu.degree)));
            section.push_str(&format!(
                "      <p class=\"institute\">{}</p>\n",
                escape_text(&edu.institute)
            ));
            if let Some(grade) = &edu.grade {
                section.push_str(&format!(
                    "      <span class=\"grade\">{}</span>\n",
                    escape_text(grade)
                ));
            }
            section.push_str("    </article>\n");
        }
        section.push_str("  </div>\n");
    }

    if !profile.skills.is_empty() || !profile.interests.is_empty() {
        section.push_str("  <div id=\"skills\" class=\"skills\">\n");
        if !profile.skills.is_empty() {
            section.push_str("    <h2>Skills &amp; Expertise</h2>\n");
            section.push_str(&chip_list("skill-list", &profile.skills, 4));
        }
        if !profile.interests.is_empty() {
            section.push_str("    <h2>Interests</h2>\n");
            section.push_str(&chip_list("interest-list", &profile.interests, 4));
        }
        section.push_str("  </div>\n");
    }

    section.push_str("</section>\n");
    section
}

/// Categorized skill groups; empty string when absent or empty
pub(crate) fn render_arsenal(profile: &Profile) -> String {
    let groups = profile.arsenal_groups();
    if groups.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("<section id=\"arsenal\" class=\"arsenal\">\n");
    section.push_str("  <h2>Technical Arsenal</h2>\n");
    section.push_str("  <div class=\"arsenal-grid\">\n");
    for group in groups {
        section.push_str(&format!(
            "    <article class=\"card arsenal-group\" data-icon=\"{}\">\n",
            escape_attr(&group.icon)
        ));
        section.push_str(&format!(
            "      <h3>{}</h3>\n",
            escape_text(&group.category)
        ));
        if !group.items.is_empty() {
            section.push_str(&chip_list("arsenal-items", &group.items, 6));
        }
        section.push_str("    </article>\n");
    }
    section.push_str("  </div>\n");
    section.push_str("</section>\n");
    section
}

/// Project gallery; empty string when absent or empty
pub(crate) fn render_projects(profile: &Profile) -> String {
    let projects = profile.project_list();
    if projects.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("<section id=\"projects\" class=\"projects\">\n");
    section.push_str("  <h2>Projects</h2>\n");
    section.push_str("  <div class=\"project-grid\">\n");
    for project in projects {
        section.push_str("    <article class=\"card project\">\n");
        if let Some(image) = &project.image {
            section.push_str(&format!(
                "      <img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n",
                escape_attr(image),
                escape_attr(&project.name)
            ));
        }
        section.push_str(&format!("      <h3>{}</h3>\n", escape_text(&project.name)));
        section.push_str(&format!(
            "      <p>{}</p>\n",
            escape_text(&project.description)
        ));
        if !project.tags.is_empty() {
            section.push_str(&chip_list("tags", &project.tags, 6));
        }
        if project.code_url.is_some() || project.live_url.is_some() {
            section.push_str("      <div class=\"project-links\">\n");
            if let Some(code_url) = &project.code_url {
                section.push_str(&format!(
                    "        <a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">Code</a>\n",
                    escape_attr(code_url)
                ));
            }
            if let Some(live_url) = &project.live_url {
                section.push_str(&format!(
                    "        <a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">Live Demo</a>\n",
                    escape_attr(live_url)
                ));
            }
            section.push_str("      </div>\n");
        }
        section.push_str("    </article>\n");
    }
    section.push_str("  </div>\n");
    section.push_str("</section>\n");
    section
}

fn render_contact(profile: &Profile) -> String {
    let mut contact = String::new();
    contact.push_str("<section id=\"contact\" class=\"contact\">\n");
    contact.push_str("  <div class=\"contact-details\">\n");
    contact.push_str("    <h2>Let's work together</h2>\n");
    contact.push_str(
        "    <p>Have a project in mind or just want to say hi? Feel free to reach out.</p>\n",
    );
    contact.push_str(&format!(
        "    <div class=\"contact-item\"><span class=\"label\">Email Me</span><p>{}</p></div>\n",
        escape_text(&profile.email)
    ));
    contact.push_str(&format!(
        "    <div class=\"contact-item\"><span class=\"label\">Call Me</span><p>{}</p></div>\n",
        escape_text(&profile.phone)
    ));
    contact.push_str("  </div>\n");

    // No submission endpoint exists; the form never leaves the page
    contact.push_str("  <form class=\"contact-form\" onsubmit=\"return false;\">\n");
    contact.push_str("    <input type=\"text\" name=\"name\" placeholder=\"Your Name\">\n");
    contact.push_str("    <input type=\"email\" name=\"email\" placeholder=\"Your Email\">\n");
    contact.push_str("    <input type=\"text\" name=\"subject\" placeholder=\"Subject\">\n");
    contact.push_str(
        "    <textarea name=\"message\" rows=\"4\" placeholder=\"Your Message\"></textarea>\n",
    );
    contact.push_str(
        "    <button type=\"submit\" class=\"button button-primary\">Send Message</button>\n",
    );
    contact.push_str("  </form>\n");
    contact.push_str("</section>\n");
    contact
}

fn render_footer(page: &Page, profile: &Profile) -> String {
    let mut footer = String::new();
    footer.push_str("<footer class=\"footer\">\n");

    let copyright = match page.clock().year() {
        Some(year) => format!("&copy; {} {}.", year, SITE_LABEL),
        None => format!("&copy; {}.", SITE_LABEL),
    };
    footer.push_str(&format!(
        "  <p class=\"copyright\">{} All rights reserved.</p>\n",
        copyright
    ));

    let links = profile.socials.footer_links();
    if !links.is_empty() {
        footer.push_str("  <div class=\"footer-socials\">\n");
        for link in &links {
            footer.push_str(&format!("    {}\n", social_anchor(link, false)));
        }
        footer.push_str("  </div>\n");
    }

    if !page.clock().display().is_empty() {
        footer.push_str(&format!(
            "  <p class=\"clock\"><time>{}</time></p>\n",
            escape_text(page.clock().display())
        ));
    }

    footer.push_str("  <p class=\"built-with\">Built with &hearts; and Rust</p>\n");
    footer.push_str("</footer>\n");
    footer
}

fn render_scroll_to_top(page: &Page) -> String {
    let hidden = if page.scroll().is_visible() {
        ""
    } else {
        " hidden"
    };
    format!(
        "<a href=\"#\" class=\"scroll-top\" aria-label=\"Scroll to top\"{}>&uarr;</a>\n",
        hidden
    )
}

/// Anchor for one social link; the About card shows labels, the footer
/// shows icons only
fn social_anchor(link: &SocialLink<'_>, labelled: bool) -> String {
    if labelled {
        format!(
            "<a href=\"{}\" class=\"social social-{}\" target=\"_blank\" rel=\"noreferrer\">{}</a>",
            escape_attr(link.url),
            link.kind.slug(),
            link.kind.label()
        )
    } else {
        format!(
            "<a href=\"{}\" class=\"social social-{}\" aria-label=\"{}\"></a>",
            escape_attr(link.url),
            link.kind.slug(),
            link.kind.label()
        )
    }
}

fn chip_list(class: &str, items: &[String], depth: usize) -> String {
    let pad = " ".repeat(depth);
    let mut list = format!("{}<ul class=\"{}\">\n", pad, class);
    for item in items {
        list.push_str(&format!("{}  <li>{}</li>\n", pad, escape_text(item)));
    }
    list.push_str(&format!("{}</ul>\n", pad));
    list
}
