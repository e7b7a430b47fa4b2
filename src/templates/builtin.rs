// Built-in narrative, prompt and email templates
//
// Names ending in `.html` are rendered with autoescaping, everything else as
// plain text.

use std::collections::HashMap;

/// Built-in template names
pub const SUMMARY: &str = "summary.md";
pub const EXECUTIVE_DIAGNOSIS: &str = "executive_diagnosis.txt";
pub const ACTION_PLANS: &str = "action_plans.txt";
pub const PROJECT_CONTEXT: &str = "project_context.txt";
pub const COMMERCIAL_PROPOSAL: &str = "commercial_proposal.md";

// Completion prompts
pub const RECOMMENDATIONS_SYSTEM: &str = "recommendations_system.txt";
pub const RECOMMENDATIONS_USER: &str = "recommendations_user.txt";
pub const PROPOSAL_PITCH_SYSTEM: &str = "proposal_pitch_system.txt";

// Emails
pub const DIAGNOSIS_EMAIL: &str = "diagnosis_email.html";
pub const INTERNAL_NOTIFICATION_EMAIL: &str = "internal_notification_email.html";
pub const PROPOSAL_EMAIL: &str = "proposal_email.html";
pub const TEST_EMAIL: &str = "test_email.html";

/// Get all built-in templates
pub fn get_builtin_templates() -> HashMap<String, String> {
    list_builtin_templates()
        .into_iter()
        .filter_map(|name| get_builtin_template(name).map(|t| (name.to_string(), t.to_string())))
        .collect()
}

/// Get a specific built-in template by name
pub fn get_builtin_template(name: &str) -> Option<&'static str> {
    match name {
        SUMMARY => Some(SUMMARY_TEMPLATE),
        EXECUTIVE_DIAGNOSIS => Some(EXECUTIVE_DIAGNOSIS_TEMPLATE),
        ACTION_PLANS => Some(ACTION_PLANS_TEMPLATE),
        PROJECT_CONTEXT => Some(PROJECT_CONTEXT_TEMPLATE),
        COMMERCIAL_PROPOSAL => Some(COMMERCIAL_PROPOSAL_TEMPLATE),
        RECOMMENDATIONS_SYSTEM => Some(RECOMMENDATIONS_SYSTEM_TEMPLATE),
        RECOMMENDATIONS_USER => Some(RECOMMENDATIONS_USER_TEMPLATE),
        PROPOSAL_PITCH_SYSTEM => Some(PROPOSAL_PITCH_SYSTEM_TEMPLATE),
        DIAGNOSIS_EMAIL => Some(DIAGNOSIS_EMAIL_TEMPLATE),
        INTERNAL_NOTIFICATION_EMAIL => Some(INTERNAL_NOTIFICATION_EMAIL_TEMPLATE),
        PROPOSAL_EMAIL => Some(PROPOSAL_EMAIL_TEMPLATE),
        TEST_EMAIL => Some(TEST_EMAIL_TEMPLATE),
        _ => None,
    }
}

/// List all built-in template names
pub fn list_builtin_templates() -> Vec<&'static str> {
    vec![
        SUMMARY,
        EXECUTIVE_DIAGNOSIS,
        ACTION_PLANS,
        PROJECT_CONTEXT,
        COMMERCIAL_PROPOSAL,
        RECOMMENDATIONS_SYSTEM,
        RECOMMENDATIONS_USER,
        PROPOSAL_PITCH_SYSTEM,
        DIAGNOSIS_EMAIL,
        INTERNAL_NOTIFICATION_EMAIL,
        PROPOSAL_EMAIL,
        TEST_EMAIL,
    ]
}

const SUMMARY_TEMPLATE: &str = r#"## Datos de Contacto
- **Nombre:** {{ name }}
- **Email:** {{ email }}
- **Teléfono:** {{ phone_display }}
- **Empresa:** {{ company }}
- **Industria:** {{ industry }}

## Situación Actual
- **Proceso actual:** {{ currentProcess }}
- **Tareas manuales:** {{ manualTasks }}

## Problemática
- **Dolor principal:** {{ mainPainPoint }}
- **Pérdidas actuales:** {{ currentLosses }}
- **Consecuencia a 6 meses:** {{ sixMonthConsequence }}

## Objetivos
- **Objetivo de negocio:** {{ businessObjective }}
- **Prioridad:** {{ priority }}/10{% if urgent %} (URGENTE){% endif %}
- **Términos y Condiciones:** {{ terms_display }}

---
*Diagnóstico generado automáticamente el {{ date }}*"#;

const EXECUTIVE_DIAGNOSIS_TEMPLATE: &str = r#"DIAGNÓSTICO EJECUTIVO: {{ company_upper }}
==================================================

1. RESUMEN DE LA SITUACIÓN ACTUAL
Estructura operativa en el sector {{ industry_display }}.
Situación actual: {{ currentProcess }}

2. DESAFÍOS OPERATIVOS IDENTIFICADOS
El cliente reporta una carga significativa en tareas manuales: {{ manualTasks }}.
Punto crítico (Dolor): {{ mainPainPoint }}

3. IMPACTO DE NO ACTUAR
Pérdidas actuales estimadas: {{ currentLosses }}.
Proyección a 6 meses sin intervención: {{ sixMonthConsequence }}.

4. ALINEACIÓN CON OBJETIVOS DE NEGOCIO
Objetivo estratégico: {{ businessObjective }}.
Nivel de urgencia: {{ priority }}/10.

---
Generado por Volkern Diagnosis Engine
Fecha: {{ date }}"#;

const ACTION_PLANS_TEMPLATE: &str = r#"PROPUESTA DE PLANES DE ACCIÓN: {{ company_upper }}
==================================================

PLAN A: IMPLEMENTACIÓN INMEDIATA (QUICK WINS)
--------------------------------------------
Objetivo: Mitigar el dolor principal ({{ pain_display }}) de forma rápida.
1. Automatización de entrada de datos básica usando herramientas No-Code.
2. Centralización de contactos en Volkern CRM.
3. Configuración de respuestas automáticas iniciales en WhatsApp.
Beneficio: Reducción inmediata de la carga operativa inicial en un 20-30%.

PLAN B: TRANSFORMACIÓN INTEGRAL (CORE AUTOMATION)
--------------------------------------------
Objetivo: Optimizar el proceso completo de {{ process_display }}.
1. Integración profunda de flujos de trabajo entre departamentos.
2. Automatización del ciclo de vida del cliente (Lead -> Venta -> Post-venta).
3. Implementación de dashboards de métricas en tiempo real.
Beneficio: Aumento de la eficiencia operativa en un 50% y eliminación de errores humanos.

PLAN C: ESCALAMIENTO Y FUTURO (AI-ENABLED)
--------------------------------------------
Objetivo: Alineación con el objetivo estratégico: {{ objective_display }}.
1. Agentes de IA dedicados para atención al cliente 24/7.
2. Análisis predictivo de ventas y comportamiento del cliente.
3. Automatización avanzada impulsada por modelos de lenguaje específicos.
Beneficio: Ventaja competitiva sostenible y escalabilidad sin aumentar proporcionalmente la plantilla.

---
Análisis generado automáticamente por Volkern AI
Fecha de análisis: {{ date }}"#;

const PROJECT_CONTEXT_TEMPLATE: &str = r#"DIAGNÓSTICO DE AUTOMATIZACIÓN
=============================

EMPRESA: {{ company }}
INDUSTRIA: {{ industry }}
PRIORIDAD: {{ priority }}/10

PROCESO ACTUAL:
{{ currentProcess }}

TAREAS MANUALES:
{{ manualTasks }}

DOLOR PRINCIPAL:
{{ mainPainPoint }}

PÉRDIDAS ACTUALES:
{{ currentLosses }}

CONSECUENCIA SI NO SE ACTÚA (6 meses):
{{ sixMonthConsequence }}

OBJETIVO DE NEGOCIO:
{{ businessObjective }}

---
Generado: {{ timestamp }}"#;

const COMMERCIAL_PROPOSAL_TEMPLATE: &str = r#"# Propuesta Comercial: {{ company_display }}

**Versión:** {{ version }} | **Enfoque:** {% if aggressive %}Alto Impacto (Transformación con IA){% else %}Eficiencia (Optimización de Procesos){% endif %}
**Preparada para:** {{ name }} | **Fecha:** {{ date }}

## 1. Contexto
{% if mainPainPoint %}El principal desafío identificado es: {{ mainPainPoint }}.{% else %}Propuesta basada en la información registrada del cliente.{% endif %}
{% if businessObjective %}Objetivo de negocio: {{ businessObjective }}.{% endif %}

## 2. Enfoque Propuesto
{% if aggressive -%}
- Rediseño completo del ciclo comercial con agentes de IA.
- Automatización de punta a punta de {{ process_display }}.
- Tableros predictivos y atención al cliente 24/7.
{%- else -%}
- Eliminación de tareas manuales de mayor frecuencia.
- Centralización de clientes y seguimiento en el CRM.
- Automatizaciones graduales con retorno medible en 30 días.
{%- endif %}

## 3. Visión Estratégica
{{ pitch }}
{% if consultation_notes %}
## 4. Notas de la Consulta
{{ consultation_notes }}
{% endif %}
## Inversión y Plazos
- **Inversión:** {{ investment_display }}
- **Tiempo estimado:** {{ time_display }}

---
*Propuesta generada por Volkern Strategy & Automation*"#;

const RECOMMENDATIONS_SYSTEM_TEMPLATE: &str = r#"Eres un consultor senior de automatización e inteligencia artificial para pequeñas y medianas empresas.
Redacta una hoja de ruta breve y accionable en español con tres planes escalonados (inmediato, integral, escalamiento).
Usa encabezados markdown de nivel 3 (###) para cada plan y viñetas para los pasos. No inventes cifras que el cliente no haya dado."#;

const RECOMMENDATIONS_USER_TEMPLATE: &str = r#"Empresa: {{ company }} ({{ industry }})
Proceso actual: {{ currentProcess }}
Tareas manuales: {{ manualTasks }}
Dolor principal: {{ mainPainPoint }}
Pérdidas actuales: {{ currentLosses }}
Consecuencia a 6 meses: {{ sixMonthConsequence }}
Objetivo de negocio: {{ businessObjective }}
Urgencia: {{ priority }}/10"#;

const PROPOSAL_PITCH_SYSTEM_TEMPLATE: &str = r#"Eres un consultor comercial. Escribe un párrafo de visión estratégica (máximo 120 palabras) en español para una propuesta {% if aggressive %}de alto impacto basada en transformación con IA{% else %}conservadora centrada en eficiencia operativa{% endif %}. No incluyas precios."#;

const DIAGNOSIS_EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Tu Diagnóstico de Automatización - Dimension Expert</title>
</head>
<body style="font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #334155; background-color: #f8fafc;">
    <div style="max-width: 600px; margin: 20px auto; background: white; border-radius: 12px; overflow: hidden;">
        <div style="background: #0f172a; padding: 40px 20px; text-align: center;">
            <h1 style="color: #ffffff; margin: 0; font-size: 24px;">ANÁLISIS DE TRANSFORMACIÓN IA</h1>
        </div>
        <div style="padding: 40px 30px;">
            <p>Hola <strong>{{ name }}</strong>,</p>
            <p>Gracias por completar tu diagnóstico de automatización. Hemos analizado la situación de <strong>{{ company }}</strong> y aquí tienes los resultados preliminares.</p>
            <div style="background: #eff6ff; border: 1px solid #bfdbfe; padding: 20px; border-radius: 8px; text-align: center;">
                <p style="margin: 0; font-weight: 600; color: #1e40af;">Un especialista revisará este informe y se pondrá en contacto contigo en las próximas 24 horas.</p>
            </div>
            <h2 style="color: #2563eb; font-size: 18px;">Diagnóstico Ejecutivo</h2>
            <div style="background: #f1f5f9; padding: 20px; border-left: 4px solid #2563eb;">
                {{ executive_html | safe }}
            </div>
            <h2 style="color: #2563eb; font-size: 18px;">Tu Hoja de Ruta Estratégica</h2>
            <div style="font-size: 14px;">
                {{ plans_html | safe }}
            </div>
            <div style="text-align: center; margin: 45px 0;">
                <a href="{{ booking_url }}" style="background-color: #2563eb; color: #ffffff; padding: 15px 30px; text-decoration: none; border-radius: 5px; font-weight: bold;">AGENDAR SESIÓN ESTRATÉGICA (20 MIN)</a>
            </div>
        </div>
        <div style="background: #f8fafc; padding: 30px; text-align: center; font-size: 12px; color: #64748b;">
            <p>© {{ year }} Dimension Expert. Todos los derechos reservados.</p>
            <p>Este correo se envía en cumplimiento con los términos y condiciones aceptados al realizar el diagnóstico.</p>
        </div>
    </div>
</body>
</html>"#;

const INTERNAL_NOTIFICATION_EMAIL_TEMPLATE: &str = r#"<div style="font-family: sans-serif; line-height: 1.5; color: #333;">
    <h2>Nuevo Lead desde Diagnóstico IA</h2>
    <p>Se ha registrado un nuevo lead con alta intención operativa.</p>
    <table style="width: 100%; border-collapse: collapse;">
        <tr><td style="padding: 8px;"><strong>Nombre:</strong></td><td style="padding: 8px;">{{ name }}</td></tr>
        <tr><td style="padding: 8px;"><strong>Email:</strong></td><td style="padding: 8px;">{{ email }}</td></tr>
        <tr><td style="padding: 8px;"><strong>Teléfono:</strong></td><td style="padding: 8px;">{{ phone_display }}</td></tr>
        <tr><td style="padding: 8px;"><strong>Empresa:</strong></td><td style="padding: 8px;">{{ company }}</td></tr>
        <tr><td style="padding: 8px;"><strong>Dolor Principal:</strong></td><td style="padding: 8px;">{{ mainPainPoint }}</td></tr>
        <tr><td style="padding: 8px;"><strong>Prioridad:</strong></td><td style="padding: 8px;">{{ priority }}/10{% if urgent %} URGENTE{% endif %}</td></tr>
    </table>
    <div style="margin-top: 25px;">
        <a href="{{ lead_url }}" style="background-color: #111827; color: white; padding: 10px 20px; text-decoration: none; border-radius: 4px;">VER LEAD EN VOLKERN</a>
    </div>
</div>"#;

const PROPOSAL_EMAIL_TEMPLATE: &str = r#"<div style="font-family: 'Helvetica Neue', Helvetica, Arial, sans-serif; color: #1f2937; max-width: 600px; margin: 0 auto; line-height: 1.6;">
    <div style="background-color: #2563eb; padding: 40px 20px; text-align: center;">
        <h1 style="color: #ffffff; margin: 0; font-size: 24px;">PROPUESTA COMERCIAL</h1>
        <p style="color: #bfdbfe; margin-top: 10px;">Volkern Strategy &amp; Automation</p>
    </div>
    <div style="padding: 30px; border: 1px solid #e5e7eb; border-top: none;">
        <p>Hola <strong>{{ name }}</strong>,</p>
        <p>Te compartimos la propuesta detallada para la transformación operativa de <strong>{{ company }}</strong>.</p>
        <div style="background-color: #f0f9ff; padding: 20px; border-radius: 6px; border: 1px solid #bae6fd;">
            <p style="margin: 0; font-weight: 500; color: #0369a1;">{{ preview }}</p>
        </div>
        <div style="text-align: center; margin: 40px 0;">
            <a href="{{ view_url }}" style="background-color: #111827; color: #ffffff; padding: 15px 30px; text-decoration: none; border-radius: 5px; font-weight: bold;">REVISAR PROPUESTA COMPLETA</a>
        </div>
        <p style="font-size: 14px; color: #6b7280; text-align: center;">Si tienes alguna duda técnica o comercial, responde directamente a este email.</p>
    </div>
</div>"#;

const TEST_EMAIL_TEMPLATE: &str = r#"<div style="font-family: sans-serif; padding: 20px;">
    <h1>Prueba de envío</h1>
    <p>Si recibes esto, la configuración de correo del servidor de diagnóstico está funcionando correctamente.</p>
    <p>Fecha: {{ date }}</p>
</div>"#;
