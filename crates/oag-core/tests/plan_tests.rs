use oag_core::config::{OagConfig, SplitBy};
use oag_core::ir::IrSpec;
use oag_core::plan::{GenerationPlan, build_plan};
use oag_core::resolve::{Primitive, TypeDescriptor};
use oag_core::{parse, transform};

fn ir_from_yaml(yaml: &str) -> IrSpec {
    let value: serde_json::Value = serde_yaml_ng::from_str(yaml).unwrap();
    transform::transform(&parse::from_value(value).unwrap())
}

fn plan(yaml: &str) -> GenerationPlan {
    build_plan(&ir_from_yaml(yaml), &OagConfig::default())
}

const FEEDBACK: &str = r##"
openapi: 3.0.3
info:
  title: Feedback
  version: "1"
paths:
  /feedback/{id}:
    get:
      operationId: get_feedback
      tags: [feedback]
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: string
            format: uuid
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Feedback"
  /feedback/latest:
    get:
      operationId: getFeedback
      tags: [feedback]
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: object
                properties:
                  data:
                    $ref: "#/components/schemas/Feedback"
                  meta:
                    type: object
                    properties:
                      generatedAt:
                        type: string
                        format: date-time
components:
  schemas:
    Feedback:
      type: object
      required: [id, body]
      properties:
        id:
          type: string
          format: uuid
        body:
          type: string
        author:
          $ref: "#/components/schemas/User"
        extra: {}
    User:
      type: object
      properties:
        name:
          type: string
"##;

#[test]
fn colliding_method_names_get_numeric_suffix() {
    let plan = plan(FEEDBACK);
    let endpoint = plan.endpoint("endpoints/feedback").unwrap();
    let names: Vec<&str> = endpoint
        .methods
        .iter()
        .map(|m| m.method_name.as_str())
        .collect();
    assert_eq!(names, ["get_feedback", "get_feedback_2"]);
    assert_eq!(endpoint.methods[1].operation_id, "getFeedback");
}

#[test]
fn methods_carry_resolved_types() {
    let plan = plan(FEEDBACK);
    let endpoint = plan.endpoint("endpoints/feedback").unwrap();

    let first = &endpoint.methods[0];
    assert_eq!(first.parameters[0].member_name, "id");
    assert_eq!(
        first.parameters[0].descriptor,
        TypeDescriptor::Primitive(Primitive::Uuid)
    );
    assert_eq!(first.return_type, TypeDescriptor::Named("Feedback".into()));
    assert!(!first.needs_unwrap);

    let second = &endpoint.methods[1];
    assert_eq!(second.return_type, TypeDescriptor::Named("Feedback".into()));
    assert!(second.needs_unwrap);
}

#[test]
fn endpoint_imports_are_planned() {
    let plan = plan(FEEDBACK);
    let endpoint = plan.endpoint("endpoints/feedback").unwrap();
    assert_eq!(
        endpoint.imports.block,
        "from uuid import UUID\n\nfrom ..models.feedback import Feedback"
    );
    assert_eq!(endpoint.imports.bindings["Feedback"], "Feedback");
}

#[test]
fn model_files_follow_the_schema_table() {
    let plan = plan(FEEDBACK);
    let paths: Vec<&str> = plan.models.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(
        paths,
        [
            "models/feedback",
            "models/user",
            "models/get_feedback_response_meta",
            "models/get_feedback_response",
        ]
    );

    let feedback = plan.model("Feedback").unwrap();
    assert_eq!(feedback.type_name, "Feedback");
    assert_eq!(feedback.definition, TypeDescriptor::Named("Feedback".into()));
    let fields: Vec<(&str, bool)> = feedback
        .fields
        .iter()
        .map(|f| (f.member_name.as_str(), f.required))
        .collect();
    assert_eq!(
        fields,
        [("id", true), ("body", true), ("author", false), ("extra", false)]
    );
    assert_eq!(
        feedback.imports.block,
        "from typing import Any\nfrom uuid import UUID\n\nfrom .user import User"
    );

    let meta = plan.model("GetFeedbackResponseMeta").unwrap();
    assert_eq!(meta.fields[0].member_name, "generated_at");
    assert_eq!(meta.imports.block, "from datetime import datetime");
}

#[test]
fn same_type_name_from_two_models_is_aliased() {
    let plan = plan(
        r##"
openapi: 3.0.3
paths:
  /a:
    get:
      operationId: listLower
      tags: [x]
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/pet"
  /b:
    get:
      operationId: listUpper
      tags: [x]
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Pet"
components:
  schemas:
    pet:
      type: string
    Pet:
      type: integer
"##,
    );
    let paths: Vec<&str> = plan.models.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, ["models/pet", "models/pet_2"]);

    let endpoint = plan.endpoint("endpoints/x").unwrap();
    assert_eq!(
        endpoint.imports.block,
        "from ..models.pet import Pet\nfrom ..models.pet_2 import Pet as Pet2Pet"
    );
    assert_eq!(endpoint.imports.bindings["pet"], "Pet");
    assert_eq!(endpoint.imports.bindings["Pet"], "Pet2Pet");
}

#[test]
fn model_never_imports_a_name_that_shadows_its_own_type() {
    let plan = plan(
        r##"
openapi: 3.0.3
paths: {}
components:
  schemas:
    Pet:
      type: object
      properties:
        friend:
          $ref: "#/components/schemas/pet"
    pet:
      type: object
      properties:
        name:
          type: string
"##,
    );
    let model = plan.model("Pet").unwrap();
    assert_eq!(model.path, "models/pet");
    assert_eq!(model.type_name, "Pet");
    assert_eq!(model.imports.block, "from .pet_2 import Pet as Pet2Pet");
    assert_eq!(model.imports.bindings["pet"], "Pet2Pet");
    assert_eq!(model.imports.bindings["Pet"], "Pet");
    assert_eq!(
        model.fields[0].descriptor,
        TypeDescriptor::optional(TypeDescriptor::Named("pet".into()))
    );
}

#[test]
fn split_by_operation_gives_one_file_each() {
    let ir = ir_from_yaml(FEEDBACK);
    let mut config = OagConfig::default();
    config.layout.split_by = SplitBy::Operation;
    let plan = build_plan(&ir, &config);
    let paths: Vec<&str> = plan.endpoints.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["endpoints/get_feedback", "endpoints/get_feedback_2"]);
    assert!(plan.endpoints.iter().all(|e| e.methods[0].method_name == "get_feedback"));
}
