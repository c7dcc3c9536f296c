use crate::prelude::*;
use bevy::color::ColorToPacked;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub struct ConfigEguiPlugin;

impl Plugin for ConfigEguiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ParameterDraft>()
            .add_systems(Startup, configure_visuals_system)
            .add_systems(Update, ui_system.in_set(GalaxySet::Configure));
    }
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    contexts.ctx_mut().set_visuals(egui::Visuals {
        window_corner_radius: 0.0.into(),
        ..Default::default()
    });
}

/// Panel-side copy of the parameters.
///
/// Widgets edit the draft freely; it's only handed over once the edit is finished
/// (pointer released, nothing focused), so a slider drag regenerates once, not every frame.
#[derive(Resource, Default)]
pub struct ParameterDraft {
    values: Option<GalaxyParameters>,
    pending: bool,
}

impl ParameterDraft {
    /// Without an unfinished edit the draft follows the committed values,
    /// so changes made elsewhere show up in the widgets.
    fn values_mut(&mut self, committed: &GalaxyParameters) -> &mut GalaxyParameters {
        if !self.pending {
            self.values = Some(committed.clone());
        }
        self.values.get_or_insert_with(|| committed.clone())
    }

    fn mark_edited(&mut self) {
        self.pending = true;
    }

    /// Returns the values to commit when an edit has just finished.
    fn finish_change(&mut self, interacting: bool) -> Option<GalaxyParameters> {
        if !self.pending || interacting {
            return None;
        }
        self.pending = false;
        let values = self.values.as_ref()?;
        let clamped = values.clamped();
        if clamped != *values {
            warn!("Galaxy parameters outside the panel range were clamped");
        }
        Some(clamped)
    }
}

fn slider_ui<Num: egui::emath::Numeric>(
    ui: &mut egui::Ui,
    value: &mut Num,
    min: Num,
    max: Num,
    step: Num,
    label: &str,
) -> bool {
    ui.add(
        egui::Slider::new(value, min..=max)
            .step_by(step.to_f64())
            .text(label),
    )
    .changed()
}

fn color_ui(ui: &mut egui::Ui, color: &mut Srgba, label: &str) -> bool {
    ui.horizontal(|ui| {
        let mut rgb = color.to_u8_array_no_alpha();
        let changed = ui.color_edit_button_srgb(&mut rgb).changed();
        ui.label(label);
        if changed {
            *color = Srgba::from_u8_array_no_alpha(rgb);
        }
        changed
    })
    .inner
}

fn ui_system(
    mut contexts: EguiContexts,
    mut draft: ResMut<ParameterDraft>,
    mut parameters: ResMut<GalaxyParameters>,
    control: Res<GalaxySpawningControl>,
) {
    let ctx = contexts.ctx_mut();

    let (min, max, step) = (
        GalaxyParameters::MIN,
        GalaxyParameters::MAX,
        GalaxyParameters::STEP,
    );
    let mut edited = false;
    let mut regenerate = false;

    egui::Window::new("Galaxy")
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
        .resizable(false)
        .default_width(260.0)
        .show(ctx, |ui| {
            let values = draft.values_mut(&parameters);

            edited |= slider_ui(ui, &mut values.count, min.count, max.count, step.count, "count");
            edited |= slider_ui(ui, &mut values.size, min.size, max.size, step.size, "size");
            edited |= slider_ui(ui, &mut values.radius, min.radius, max.radius, step.radius, "radius");
            edited |= slider_ui(
                ui,
                &mut values.branches,
                min.branches,
                max.branches,
                step.branches,
                "branches",
            );
            edited |= slider_ui(ui, &mut values.spin, min.spin, max.spin, step.spin, "spin");
            edited |= slider_ui(
                ui,
                &mut values.randomness,
                min.randomness,
                max.randomness,
                step.randomness,
                "randomness",
            );
            edited |= slider_ui(
                ui,
                &mut values.randomness_power,
                min.randomness_power,
                max.randomness_power,
                step.randomness_power,
                "randomnessPower",
            );
            edited |= color_ui(ui, &mut values.inside_color, "insideColor");
            edited |= color_ui(ui, &mut values.outside_color, "outsideColor");

            ui.separator();
            ui.horizontal(|ui| {
                regenerate = ui.button("Regenerate").clicked();
                ui.label(format!("{} particles", control.particle_count()));
            });
        });

    if edited {
        draft.mark_edited();
    }

    let interacting = ctx.is_using_pointer() || ctx.memory(|memory| memory.focused().is_some());
    if let Some(values) = draft.finish_change(interacting) {
        if !values.same_values(&parameters) {
            parameters.apply_values(&values);
        }
    }

    if regenerate {
        // same values, fresh random draw
        parameters.generation += 1;
    }
}
