// Server-rendered marketing pages: the landing page and the features showcase.

use minijinja::{context, Environment};
use serde::Serialize;

use crate::features::FEATURES;
use crate::particles::{ParticleField, PARTICLE_FILL};
use crate::sections::{InputSource, Section, WHEEL_THRESHOLD};
use crate::throttle::ThrottleKey;

const BRAND: &str = "Quest Master";

const HEADLINES: [&str; 3] = ["Level Up Your Life", "Begin Your Quest", "Master Your Tasks"];

#[derive(Serialize)]
struct Step {
    title: &'static str,
    description: &'static str,
    details: [&'static str; 4],
}

const HOW_IT_WORKS: [Step; 3] = [
    Step {
        title: "Create Daily Quests",
        description: "Transform your tasks into daily quests with rewards and experience points.",
        details: [
            "Set custom rewards and XP for each task",
            "Create recurring daily challenges",
            "Add difficulty levels to tasks",
            "Track completion streaks",
        ],
    },
    Step {
        title: "Gain Experience",
        description: "Complete quests to earn XP and level up your character.",
        details: [
            "Earn XP for completed tasks",
            "Level up your character",
            "Unlock new abilities and features",
            "Track your progress over time",
        ],
    },
    Step {
        title: "Track Progress",
        description: "Monitor your growth with detailed statistics and achievements.",
        details: [
            "View detailed completion stats",
            "Earn achievement badges",
            "Compare daily and weekly progress",
            "Set and track personal goals",
        ],
    },
];

const ABOUT_HIGHLIGHTS: [&str; 6] = [
    "Daily Quest System",
    "Experience Points & Leveling",
    "Achievement Tracking",
    "Streak Bonuses",
    "AI-Powered Insights",
    "Social Features",
];

// ── Templates ────────────────────────────────────────────────────────

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ title }}</title>
<style>
body{margin:0;background:#111111;color:#eeeeee;font-family:system-ui,sans-serif}
h1,h2,h3,h4,.brand,.cta,.back{font-family:'Press Start 2P',monospace;color:#44dd44}
h2{text-align:center;margin-bottom:4rem}
.top-nav{position:fixed;top:0;left:0;right:0;z-index:50;display:flex;justify-content:space-between;align-items:center;height:4rem;padding:0 2rem;background:rgba(17,17,17,.9);border-bottom:1px solid rgba(68,221,68,.2)}
.nav-links{display:flex;gap:2rem}
.nav-link{color:#888888;text-decoration:none;font-size:.875rem}
.nav-link.active,.nav-link:hover{color:#44dd44}
.particles{position:fixed;inset:0;pointer-events:none}
.snap{height:100vh;overflow-y:scroll;scroll-snap-type:y mandatory}
.page-section{height:100vh;scroll-snap-align:start;display:flex;align-items:center;opacity:.5;transition:opacity .5s}
.page-section.active{opacity:1}
.center{text-align:center;max-width:56rem;margin:0 auto}
.wide{max-width:80rem;margin:0 auto;padding:0 2rem;width:100%}
.page{padding-top:6rem;padding-bottom:6rem}
.tagline,.muted{color:#888888}
.accent{color:#44dd44}
.cta{display:inline-block;padding:1.5rem 3rem;background:#44dd44;color:#111111;border-radius:.5rem;text-decoration:none}
.grid{display:grid;gap:2rem}
.grid.two{grid-template-columns:repeat(auto-fit,minmax(20rem,1fr))}
.grid.three{grid-template-columns:repeat(auto-fit,minmax(16rem,1fr))}
.grid.four{grid-template-columns:repeat(auto-fit,minmax(12rem,1fr))}
.card{display:block;background:#222222;padding:2rem;border-radius:.75rem;border:2px solid #44dd44;text-decoration:none;transition:transform .2s}
.card:hover{transform:scale(1.03);background:#1d1d1d}
.card-head{display:flex;align-items:center;gap:1rem}
.icon{font-size:1.875rem}.icon.big{font-size:2.25rem;display:block;margin-bottom:1rem}
.details,.plain{list-style:none;padding:0}
.back{display:inline-block;margin-bottom:3rem;text-decoration:none;font-size:.875rem}
footer{padding:1.25rem 2rem}.credit{text-align:center;border-top:1px solid #333333;padding-top:2rem}
</style>
</head>
<body>
{% block body %}{% endblock %}
</body>
</html>
"#;

const LANDING_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block body %}
<nav class="top-nav"><span class="brand">{{ brand }}</span><div class="nav-links">
{%- for s in sections %}<a class="nav-link{% if s.id == active %} active{% endif %}" href="#{{ s.id }}" data-section="{{ s.id }}">{{ s.label }}</a>{% endfor -%}
</div></nav>
<canvas id="particles" class="particles"></canvas>
<main class="snap">
{%- for s in sections %}
<section id="{{ s.id }}" class="page-section{% if s.id == active %} active{% endif %}">
{%- if s.id == "hero" %}
<div class="center">
<h1 class="headline" id="headline">{{ headlines[0] }}</h1>
<p class="tagline">Transform your daily tasks into epic quests. Track your progress, earn rewards, and become the hero of your own story.</p>
<a class="cta" href="/login">Start Your Journey &rarr;</a>
</div>
{%- elif s.id == "how-it-works" %}
<div class="wide"><h2>How It Works</h2><div class="grid three">
{%- for step in steps %}
<div class="card step"><h3>{{ step.title }}</h3><p class="muted">{{ step.description }}</p><ul class="details">
{%- for d in step.details %}<li>&#10003; {{ d }}</li>{% endfor -%}
</ul></div>
{%- endfor %}
</div></div>
{%- elif s.id == "features" %}
<div class="wide"><h2>Features</h2><div class="grid three">
{%- for f in features %}
<div class="card"><div class="card-head"><span class="icon">{{ f.icon }}</span><h3>{{ f.title }}</h3></div><p class="muted">{{ f.description }}</p></div>
{%- endfor %}
</div></div>
{%- else %}
<div class="wide grid two">
<div><h2>About {{ brand }}</h2>
<p class="muted">{{ brand }} turns everyday productivity into an adventure. Every task is a quest, every habit a skill to level up, and every streak a reward worth protecting.</p>
<p class="accent">Join the Adventure</p></div>
<div class="card"><ul class="details">
{%- for h in highlights %}<li>&#10003; {{ h }}</li>{% endfor -%}
</ul></div>
</div>
{%- endif %}
</section>
{%- endfor %}
</main>
<footer>
<div class="grid four">
<div><h4>{{ brand }}</h4><p class="muted">Level up your productivity with gamified task management.</p></div>
<div><h4>Resources</h4><ul class="muted plain"><li>Documentation</li><li>API</li><li>Support</li><li>Community</li></ul></div>
<div><h4>Connect</h4><ul class="muted plain"><li>Twitter</li><li>Discord</li><li>GitHub</li><li>Blog</li></ul></div>
</div>
<p class="muted credit">Made with <span class="accent">&hearts;</span> by Team - 13</p>
</footer>
<script type="application/json" id="page-state">{{ state|tojson }}</script>
<script>
{% raw %}(function () {
  var state = JSON.parse(document.getElementById('page-state').textContent);
  var ids = state.sections, active = state.active;
  function throttle(fn, ms) {
    var last = -Infinity;
    return function (e) {
      var now = performance.now();
      if (now - last < ms) return;
      last = now;
      fn(e);
    };
  }
  function setActive(id) {
    active = id;
    document.querySelectorAll('.page-section').forEach(function (s) { s.classList.toggle('active', s.id === id); });
    document.querySelectorAll('.nav-link').forEach(function (a) { a.classList.toggle('active', a.dataset.section === id); });
  }
  function go(offset) {
    var i = ids.indexOf(active) + offset;
    if (i < 0 || i >= ids.length) return;
    document.getElementById(ids[i]).scrollIntoView({ behavior: 'smooth', block: 'start' });
  }
  var observer = new IntersectionObserver(throttle(function (entries) {
    entries.forEach(function (e) { if (e.isIntersecting) setActive(e.target.id); });
  }, state.throttle_ms.intersection), { rootMargin: '-50% 0px', threshold: 0 });
  ids.forEach(function (id) { observer.observe(document.getElementById(id)); });
  window.addEventListener('wheel', function (e) { e.preventDefault(); wheel(e); }, { passive: false });
  var wheel = throttle(function (e) {
    if (Math.abs(e.deltaY) < state.wheel_threshold) return;
    go(e.deltaY > 0 ? 1 : -1);
  }, state.throttle_ms.wheel);
  window.addEventListener('keydown', throttle(function (e) {
    if (e.key === 'ArrowDown') { e.preventDefault(); go(1); }
    else if (e.key === 'ArrowUp') { e.preventDefault(); go(-1); }
  }, state.throttle_ms.keyboard));
  document.querySelectorAll('.nav-link').forEach(function (a) {
    a.addEventListener('click', function (e) {
      e.preventDefault();
      document.getElementById(a.dataset.section).scrollIntoView({ behavior: 'smooth' });
      setActive(a.dataset.section);
    });
  });
  if (active !== ids[0]) document.getElementById(active).scrollIntoView();

  var canvas = document.getElementById('particles'), ctx = canvas.getContext('2d');
  var field = state.particles, sx = 1, sy = 1;
  function resize() {
    canvas.width = window.innerWidth; canvas.height = window.innerHeight;
    sx = canvas.width / field.width; sy = canvas.height / field.height;
  }
  resize();
  window.addEventListener('resize', resize);
  (function frame() {
    ctx.clearRect(0, 0, canvas.width, canvas.height);
    ctx.fillStyle = state.particle_fill;
    field.particles.forEach(function (p) {
      p.y -= p.speed;
      if (p.y < 0) { p.y = field.height; p.x = Math.random() * field.width; }
      ctx.beginPath(); ctx.arc(p.x * sx, p.y * sy, p.size, 0, Math.PI * 2); ctx.fill();
    });
    requestAnimationFrame(frame);
  })();

  var h = document.getElementById('headline'), n = 0;
  setInterval(function () { n = (n + 1) % state.headlines.length; h.textContent = state.headlines[n]; }, 3000);
})();{% endraw %}
</script>
{% endblock %}
"##;

const FEATURES_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block body %}
<div class="wide page">
<a class="back" href="/home">&larr; Back to Home</a>
<div class="grid three">
{%- for f in features %}
<a class="card feature-link" href="{{ f.path }}" style="border-color: {{ f.color }}"><span class="icon big">{{ f.icon }}</span><h3 style="color: {{ f.color }}">{{ f.title }}</h3><p class="muted">{{ f.description }}</p></a>
{%- endfor %}
</div>
</div>
{% endblock %}
"#;

// ── Landing page state ───────────────────────────────────────────────

/// Parameters the client script needs to reproduce the section tracker and
/// animate the particle field.
#[derive(Serialize)]
struct PageState<'a> {
    sections: Vec<&'static str>,
    active: Section,
    throttle_ms: ThrottleIntervals,
    wheel_threshold: f64,
    particle_fill: &'static str,
    particles: &'a ParticleField,
    headlines: [&'static str; 3],
}

#[derive(Serialize)]
struct ThrottleIntervals {
    wheel: u64,
    keyboard: u64,
    scroll: u64,
    intersection: u64,
}

impl ThrottleIntervals {
    fn current() -> Self {
        Self {
            wheel: millis(InputSource::Wheel),
            keyboard: millis(InputSource::Keyboard),
            scroll: millis(InputSource::Scroll),
            intersection: millis(InputSource::Intersection),
        }
    }
}

fn millis(source: InputSource) -> u64 {
    source.min_interval().as_millis() as u64
}

#[derive(Serialize)]
struct SectionLink {
    id: &'static str,
    label: &'static str,
}

// ── Renderer ─────────────────────────────────────────────────────────

/// Compiled page templates. HTML output is autoescaped.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("base.html", BASE_TEMPLATE)?;
        env.add_template("landing.html", LANDING_TEMPLATE)?;
        env.add_template("features.html", FEATURES_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the landing page with `active` as the initially highlighted section.
    pub fn landing(
        &self,
        active: Section,
        particles: &ParticleField,
    ) -> Result<String, minijinja::Error> {
        let sections: Vec<SectionLink> = Section::ALL
            .iter()
            .map(|s| SectionLink {
                id: s.id(),
                label: s.label(),
            })
            .collect();
        let state = PageState {
            sections: Section::ALL.iter().map(|s| s.id()).collect(),
            active,
            throttle_ms: ThrottleIntervals::current(),
            wheel_threshold: WHEEL_THRESHOLD,
            particle_fill: PARTICLE_FILL,
            particles,
            headlines: HEADLINES,
        };

        self.env.get_template("landing.html")?.render(context! {
            title => format!("{BRAND} - Level Up Your Life"),
            brand => BRAND,
            active => active.id(),
            sections,
            headlines => HEADLINES,
            steps => HOW_IT_WORKS,
            features => FEATURES,
            highlights => ABOUT_HIGHLIGHTS,
            state,
        })
    }

    /// Grid of every feature, each linking to its page.
    pub fn features(&self) -> Result<String, minijinja::Error> {
        self.env.get_template("features.html")?.render(context! {
            title => format!("{BRAND} - Features"),
            features => FEATURES,
        })
    }
}
