use std::f64::consts::TAU;
use std::time::Duration;

use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};
use windtunnel::flow::{FlowClass, ALL_FLOW_CLASSES};
use windtunnel::parameters::{
    ANGLE_OF_ATTACK_RANGE, ANGLE_OF_ATTACK_STEP, PERCENT_RANGE, PERCENT_STEP, WIND_SPEED_RANGE,
    WIND_SPEED_STEP,
};
use windtunnel::scene::{fan_angular_speed, VehiclePose};
use windtunnel::{SessionPhase, WindTunnel};

// Frames longer than this are treated as a stall, not simulated time
const MAX_FRAME_DT: f32 = 0.25;

const CAR_SCALE: f64 = 0.7;
const FAN_DEPTH: f64 = -10.0;

// Side profile of the car, (z, y) in car space
const BODY_PROFILE: [[f64; 2]; 9] = [
    [2.1, 0.15],
    [1.5, 0.25],
    [0.8, 0.5],
    [0.3, 0.75],
    [-0.2, 0.7],
    [-1.45, 0.5],
    [-1.5, 0.1],
    [1.5, 0.1],
    [2.1, 0.15],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlTab {
    Basic,
    Advanced,
}

pub struct WindTunnelApp {
    tunnel: WindTunnel,
    panel_expanded: bool,
    active_tab: ControlTab,
    show_vehicle: bool,
    show_flow: bool,
}

fn class_color(class: FlowClass) -> egui::Color32 {
    let [r, g, b] = class.rgb();
    // 0.8 opacity
    egui::Color32::from_rgba_unmultiplied(r, g, b, 204)
}

/// Rotate a car-space (z, y) point by `deg` degrees about `pivot`.
fn rotate_about(point: [f64; 2], pivot: [f64; 2], deg: f64) -> [f64; 2] {
    let (sin, cos) = deg.to_radians().sin_cos();
    let dz = point[0] - pivot[0];
    let dy = point[1] - pivot[1];
    [pivot[0] + dz * cos - dy * sin, pivot[1] + dz * sin + dy * cos]
}

/// Car space to tunnel space: body pitch about the origin, then scale.
fn to_tunnel(point: [f64; 2], pose: &VehiclePose) -> [f64; 2] {
    let [z, y] = rotate_about(point, [0.0, 0.0], pose.body_pitch);
    [z * CAR_SCALE, y * CAR_SCALE]
}

/// A wing seen side-on: a chord pitched about its center.
fn wing_segment(center: [f64; 2], chord: f64, pitch: f64, pose: &VehiclePose) -> Vec<[f64; 2]> {
    let lead = rotate_about([center[0] + chord * 0.5, center[1]], center, pitch);
    let trail = rotate_about([center[0] - chord * 0.5, center[1]], center, pitch);
    vec![to_tunnel(lead, pose), to_tunnel(trail, pose)]
}

impl WindTunnelApp {
    pub fn new(cc: &eframe::CreationContext<'_>, tunnel: WindTunnel) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        Self {
            tunnel,
            panel_expanded: true,
            active_tab: ControlTab::Basic,
            show_vehicle: true,
            show_flow: true,
        }
    }

    fn draw_vehicle(&self, plot_ui: &mut egui_plot::PlotUi) {
        let pose = self.tunnel.pose();

        let body: Vec<[f64; 2]> = BODY_PROFILE.iter().map(|p| to_tunnel(*p, &pose)).collect();
        plot_ui.line(
            Line::new(PlotPoints::new(body))
                .color(egui::Color32::from_rgb(224, 224, 224))
                .width(2.0),
        );

        let front_wing = wing_segment([1.5, 0.1], 0.4, pose.front_wing_pitch, &pose);
        plot_ui.line(Line::new(front_wing).color(egui::Color32::GRAY).width(3.0));

        let rear_wing = wing_segment([-1.5, 0.6], 0.3, pose.rear_wing_pitch, &pose);
        plot_ui.line(Line::new(rear_wing).color(egui::Color32::GRAY).width(3.0));

        let flap_color = if self.tunnel.parameters().drs.engaged() {
            egui::Color32::RED
        } else {
            egui::Color32::DARK_GRAY
        };
        let flap = wing_segment([-1.5, 0.7], 0.2, pose.rear_wing_pitch + pose.drs_flap, &pose);
        plot_ui.line(Line::new(flap).color(flap_color).width(3.0));
    }

    fn draw_flow_lines(&self, plot_ui: &mut egui_plot::PlotUi) {
        for line in self.tunnel.snapshot().lines {
            let points: Vec<[f64; 2]> = line.points().iter().map(|p| [p.z, p.y]).collect();
            plot_ui.line(
                Line::new(PlotPoints::new(points))
                    .color(class_color(line.class()))
                    .width(1.5),
            );
        }
    }

    fn draw_tunnel(&self, plot_ui: &mut egui_plot::PlotUi) {
        let floor = Line::new(vec![[-15.0, -0.1], [15.0, -0.1]])
            .color(egui::Color32::from_rgba_premultiplied(100, 100, 100, 100))
            .width(1.0);
        plot_ui.line(floor);

        // Fan housing seen edge-on
        let fan = Line::new(vec![[FAN_DEPTH, -1.0], [FAN_DEPTH, 5.0]])
            .color(egui::Color32::from_rgb(51, 51, 51))
            .width(4.0);
        plot_ui.line(fan);
    }

    fn show_telemetry(&self, ui: &mut egui::Ui) {
        let telemetry = self.tunnel.telemetry();
        ui.heading("Telemetry");

        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(format!("Downforce: {}", telemetry.downforce_label()));
                    ui.add(
                        egui::ProgressBar::new(telemetry.downforce_fill())
                            .fill(egui::Color32::from_rgb(34, 197, 94)),
                    );

                    ui.label(format!("Drag: {}", telemetry.drag_label()));
                    ui.add(
                        egui::ProgressBar::new(telemetry.drag_fill())
                            .fill(egui::Color32::from_rgb(239, 68, 68)),
                    );

                    ui.label(format!("Efficiency: {}", telemetry.efficiency_label()));
                    ui.add(
                        egui::ProgressBar::new(telemetry.efficiency_fill())
                            .fill(egui::Color32::from_rgb(59, 130, 246)),
                    );
                });
            });
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        let mut params = *self.tunnel.parameters();
        let mut changed = false;

        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.active_tab, ControlTab::Basic, "Basic Controls");
            ui.selectable_value(&mut self.active_tab, ControlTab::Advanced, "Advanced Settings");
        });

        match self.active_tab {
            ControlTab::Basic => {
                changed |= ui
                    .add(
                        egui::Slider::new(
                            &mut params.wind_speed,
                            WIND_SPEED_RANGE.0..=WIND_SPEED_RANGE.1,
                        )
                        .step_by(WIND_SPEED_STEP)
                        .text("Wind Speed")
                        .suffix(" km/h"),
                    )
                    .changed();
                changed |= ui
                    .add(
                        egui::Slider::new(
                            &mut params.angle_of_attack,
                            ANGLE_OF_ATTACK_RANGE.0..=ANGLE_OF_ATTACK_RANGE.1,
                        )
                        .step_by(ANGLE_OF_ATTACK_STEP)
                        .text("Angle of Attack")
                        .suffix("°"),
                    )
                    .changed();
            }
            ControlTab::Advanced => {
                for (value, label) in [
                    (&mut params.front_wing, "Front Wing"),
                    (&mut params.rear_wing, "Rear Wing"),
                    (&mut params.sidepods, "Sidepods"),
                ] {
                    changed |= ui
                        .add(
                            egui::Slider::new(value, PERCENT_RANGE.0..=PERCENT_RANGE.1)
                                .step_by(PERCENT_STEP)
                                .text(label)
                                .suffix("%"),
                        )
                        .changed();
                }
            }
        }

        if changed {
            self.tunnel.set_parameters(params.snapped());
        }
    }

    fn show_drs(&mut self, ui: &mut egui::Ui) {
        let engaged = self.tunnel.parameters().drs.engaged();
        ui.horizontal(|ui| {
            let color = if engaged {
                egui::Color32::from_rgb(34, 197, 94)
            } else {
                egui::Color32::from_rgb(239, 68, 68)
            };
            ui.colored_label(color, "●");
            ui.label("DRS");
            let text = if engaged { "Deactivate DRS" } else { "Activate DRS" };
            if ui.button(text).clicked() {
                self.tunnel.toggle_drs();
            }
        });
    }
}

impl eframe::App for WindTunnelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt).clamp(0.0, MAX_FRAME_DT);
        self.tunnel.advance(Duration::from_secs_f32(dt));

        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Wind Tunnel Controls");
                let icon = if self.panel_expanded { "−" } else { "+" };
                if ui.small_button(icon).clicked() {
                    self.panel_expanded = !self.panel_expanded;
                }
            });

            if self.tunnel.phase() == SessionPhase::Idle {
                ui.separator();
                if ui.button("Test the Tunnel Now").clicked() {
                    self.tunnel.launch();
                }
                return;
            }

            ui.separator();
            self.show_drs(ui);

            if self.panel_expanded {
                ui.separator();
                self.show_controls(ui);

                ui.separator();
                self.show_telemetry(ui);
            }

            ui.separator();
            let label = if self.tunnel.is_running() {
                "⏸ Simulation Running"
            } else {
                "▶ Start Simulation"
            };
            if ui.button(label).clicked() {
                self.tunnel.toggle_running();
            }

            ui.separator();
            ui.checkbox(&mut self.show_vehicle, "Show Vehicle");
            ui.checkbox(&mut self.show_flow, "Show Flow Lines");

            let rpm = if self.tunnel.is_running() {
                fan_angular_speed(self.tunnel.parameters().wind_speed) * 60.0 / TAU
            } else {
                0.0
            };
            ui.label(format!("Fan: {:.0} rpm", rpm));
            ui.label(format!("Flow lines: {}", self.tunnel.field().lines().len()));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Airflow Visualization");

            let plot = Plot::new("tunnel_plot")
                .data_aspect(1.0)
                .include_x(-16.0)
                .include_x(8.0)
                .include_y(-1.0)
                .include_y(5.0);

            plot.show(ui, |plot_ui| {
                self.draw_tunnel(plot_ui);

                if self.show_flow {
                    self.draw_flow_lines(plot_ui);
                }

                if self.show_vehicle {
                    self.draw_vehicle(plot_ui);
                }
            });

            ui.horizontal(|ui| {
                for class in ALL_FLOW_CLASSES {
                    ui.colored_label(class_color(class), format!("— {}", class.label()));
                }
            });
        });

        if matches!(self.tunnel.phase(), SessionPhase::Running | SessionPhase::Launching { .. }) {
            ctx.request_repaint();
        }
    }
}
